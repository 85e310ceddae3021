use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to allocate pixmap: {width}x{height}")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("Icon parse error: {0}")]
    IconParse(String),

    #[error("Icon not found: {0}")]
    IconNotFound(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_pixmap_allocation() {
        let error = RenderError::PixmapAllocation {
            width: 0,
            height: 480,
        };
        assert_eq!(error.to_string(), "Failed to allocate pixmap: 0x480");
    }

    #[test]
    fn test_render_error_icon_parse() {
        let error = RenderError::IconParse("Invalid XML".to_string());
        assert_eq!(error.to_string(), "Icon parse error: Invalid XML");
    }

    #[test]
    fn test_render_error_icon_not_found() {
        let error = RenderError::IconNotFound("stamps/missing.svg".to_string());
        assert_eq!(error.to_string(), "Icon not found: stamps/missing.svg");
    }

    #[test]
    fn test_render_error_png_encode() {
        let error = RenderError::PngEncode("Encoding failed".to_string());
        assert_eq!(error.to_string(), "PNG encode error: Encoding failed");
    }

    #[test]
    fn test_render_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: RenderError = io.into();
        match error {
            RenderError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_config_error_read_names_path() {
        let error = ConfigError::Read {
            path: "config.yaml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(error.to_string(), "Failed to read config.yaml: missing");
    }

    #[test]
    fn test_config_error_from_yaml() {
        let yaml_error = serde_yaml::from_str::<u32>("not a number").unwrap_err();
        let error: ConfigError = yaml_error.into();
        assert!(error.to_string().starts_with("Failed to parse YAML:"));
    }

    #[test]
    fn test_config_error_invalid() {
        let error = ConfigError::Invalid("bw_threshold out of range".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: bw_threshold out of range"
        );
    }
}
