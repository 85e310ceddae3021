use pixel_recolor::{AccessibilityTransform, Rgb8};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::page::PaintFlags;
use crate::error::ConfigError;

/// Rendering configuration loaded from config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Accessibility color settings
    pub accessibility: AccessibilityConfig,

    /// Outline link areas when the caller asks for link enhancement
    pub highlight_links: bool,

    /// Outline image areas when the caller asks for image enhancement
    pub highlight_images: bool,

    /// Color of link/image outlines and the source marker
    pub link_highlight_color: Rgb8,

    /// Stroke every annotation's bounding box (debugging aid)
    pub debug_draw_annotation_rect: bool,

    /// Show a busy icon instead of a plain cross when no raster is ready
    pub show_busy_placeholder: bool,
}

/// How page colors are changed for readability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    pub change_colors: bool,
    pub mode: RenderMode,
    pub paper_color: Rgb8,
    pub recolor_foreground: Rgb8,
    pub recolor_background: Rgb8,
    pub bw_contrast: i32,
    pub bw_threshold: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Only change the paper color
    Paper,
    Inverted,
    Recolor,
    BlackWhite,
    InvertLightness,
    #[default]
    InvertLuma,
    InvertLumaSymmetric,
    HueShiftPositive,
    HueShiftNegative,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self {
            change_colors: false,
            mode: RenderMode::InvertLuma,
            paper_color: Rgb8::WHITE,
            recolor_foreground: Rgb8::BLACK,
            recolor_background: Rgb8::WHITE,
            bw_contrast: 2,
            bw_threshold: 127,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            accessibility: AccessibilityConfig::default(),
            highlight_links: false,
            highlight_images: false,
            link_highlight_color: Rgb8::new(0x3d, 0xae, 0xe9),
            debug_draw_annotation_rect: false,
            show_busy_placeholder: true,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            change_colors = config.accessibility.change_colors,
            mode = ?config.accessibility.mode,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load configuration, falling back to defaults on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.accessibility;
        if !(0..=255).contains(&a.bw_threshold) {
            return Err(ConfigError::Invalid(format!(
                "bw_threshold must be within 0..=255, got {}",
                a.bw_threshold
            )));
        }
        if a.bw_contrast < 0 {
            return Err(ConfigError::Invalid(format!(
                "bw_contrast must not be negative, got {}",
                a.bw_contrast
            )));
        }
        Ok(())
    }

    /// True when this paint call changes colors at all.
    pub fn colors_changed(&self, flags: PaintFlags) -> bool {
        flags.contains(PaintFlags::ACCESSIBILITY) && self.accessibility.change_colors
    }

    /// Color the page area is cleared to before the raster is drawn.
    pub fn background_color(&self, flags: PaintFlags) -> Rgb8 {
        if !self.colors_changed(flags) {
            return Rgb8::WHITE;
        }
        match self.accessibility.mode {
            RenderMode::Paper => self.accessibility.paper_color,
            RenderMode::Recolor => self.accessibility.recolor_background,
            _ => Rgb8::WHITE,
        }
    }

    /// Pixel transform to run over the buffered raster, if any.
    ///
    /// Paper mode only changes the background and needs no transform.
    pub fn accessibility_transform(&self, flags: PaintFlags) -> Option<AccessibilityTransform> {
        if !self.colors_changed(flags) {
            return None;
        }
        let a = &self.accessibility;
        let transform = match a.mode {
            RenderMode::Paper => return None,
            RenderMode::Inverted => AccessibilityTransform::Invert,
            RenderMode::Recolor => AccessibilityTransform::Recolor {
                foreground: a.recolor_foreground,
                background: a.recolor_background,
            },
            RenderMode::BlackWhite => AccessibilityTransform::BlackWhite {
                contrast: a.bw_contrast,
                threshold: a.bw_threshold,
            },
            RenderMode::InvertLightness => AccessibilityTransform::InvertLightness,
            RenderMode::InvertLuma => AccessibilityTransform::InvertLuma,
            RenderMode::InvertLumaSymmetric => AccessibilityTransform::InvertLumaSymmetric,
            RenderMode::HueShiftPositive => AccessibilityTransform::HueShiftPositive,
            RenderMode::HueShiftNegative => AccessibilityTransform::HueShiftNegative,
        };
        Some(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();

        assert!(!config.accessibility.change_colors);
        assert_eq!(config.accessibility.mode, RenderMode::InvertLuma);
        assert_eq!(config.accessibility.bw_contrast, 2);
        assert_eq!(config.accessibility.bw_threshold, 127);
        assert_eq!(config.link_highlight_color.to_string(), "#3daee9");
        assert!(config.show_busy_placeholder);
        assert!(!config.debug_draw_annotation_rect);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = RenderConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r##"
accessibility:
  change_colors: true
  mode: black_white
  bw_threshold: 100
link_highlight_color: "#ff8800"
"##;
        let config = RenderConfig::from_yaml(yaml).unwrap();
        assert!(config.accessibility.change_colors);
        assert_eq!(config.accessibility.mode, RenderMode::BlackWhite);
        assert_eq!(config.accessibility.bw_threshold, 100);
        assert_eq!(config.accessibility.bw_contrast, 2);
        assert_eq!(config.link_highlight_color, Rgb8::new(0xff, 0x88, 0x00));
        assert!(config.show_busy_placeholder);
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let result = RenderConfig::from_yaml("accessibility:\n  mode: sepia\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_threshold_out_of_range_is_invalid() {
        let result = RenderConfig::from_yaml("accessibility:\n  bw_threshold: 300\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_transform_requires_flag_and_setting() {
        let mut config = RenderConfig::default();
        assert_eq!(config.accessibility_transform(PaintFlags::all()), None);

        config.accessibility.change_colors = true;
        assert_eq!(config.accessibility_transform(PaintFlags::empty()), None);
        assert_eq!(
            config.accessibility_transform(PaintFlags::ACCESSIBILITY),
            Some(AccessibilityTransform::InvertLuma)
        );
    }

    #[test]
    fn test_paper_mode_changes_background_only() {
        let mut config = RenderConfig::default();
        config.accessibility.change_colors = true;
        config.accessibility.mode = RenderMode::Paper;
        config.accessibility.paper_color = Rgb8::new(250, 240, 210);

        assert_eq!(config.accessibility_transform(PaintFlags::all()), None);
        assert_eq!(
            config.background_color(PaintFlags::all()),
            Rgb8::new(250, 240, 210)
        );
        assert_eq!(config.background_color(PaintFlags::empty()), Rgb8::WHITE);
    }

    #[test]
    fn test_recolor_background() {
        let mut config = RenderConfig::default();
        config.accessibility.change_colors = true;
        config.accessibility.mode = RenderMode::Recolor;
        config.accessibility.recolor_background = Rgb8::new(10, 10, 30);

        assert_eq!(
            config.background_color(PaintFlags::ACCESSIBILITY),
            Rgb8::new(10, 10, 30)
        );
        assert!(matches!(
            config.accessibility_transform(PaintFlags::ACCESSIBILITY),
            Some(AccessibilityTransform::Recolor { .. })
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = RenderConfig::load_or_default(Some(Path::new("/nonexistent/config.yaml")));
        assert_eq!(config, RenderConfig::default());
    }
}
