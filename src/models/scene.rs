//! Scene files for the `render` command: a page plus the raster under it.

use pixel_recolor::Rgb8;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::geometry::{NormalizedPoint, NormalizedRect};
use super::page::Page;
use crate::error::ConfigError;

/// A page to paint, read from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub page: Page,

    /// Base raster; a missing raster renders the placeholder
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub raster: Option<RasterSource>,

    /// Visible part of the page
    #[serde(default = "default_crop")]
    pub crop: NormalizedRect,

    #[serde(default)]
    pub source_marker: Option<NormalizedPoint>,
}

fn default_crop() -> NormalizedRect {
    NormalizedRect::full()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterSource {
    /// PNG file, relative paths resolve against the scene file
    Png(PathBuf),
    /// Solid page with gray stand-in text lines
    Blank(Rgb8),
}

impl Scene {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let scene: Self = serde_yaml::from_str(content)?;
        if scene.page.width <= 0.0 || scene.page.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "page size must be positive, got {}x{}",
                scene.page.width, scene.page.height
            )));
        }
        if scene.crop.is_null() {
            return Err(ConfigError::Invalid("crop rectangle is empty".to_string()));
        }
        Ok(scene)
    }

    /// Load a scene; PNG raster paths are resolved relative to the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut scene = Self::from_yaml(&content)?;
        if let Some(RasterSource::Png(ref mut png)) = scene.raster {
            if png.is_relative() {
                if let Some(dir) = path.parent() {
                    *png = dir.join(&*png);
                }
            }
        }
        tracing::info!(
            path = %path.display(),
            annotations = scene.page.annotations.len(),
            "Loaded scene"
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::SubType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scene_with_blank_raster() {
        let yaml = r##"
page:
  width: 200
  height: 100
  annotations:
    - type: highlight
      bounding_rect: { left: 0.1, top: 0.1, right: 0.5, bottom: 0.2 }
      highlight_type: strike_out
      quads:
        - points: [{x: 0.1, y: 0.2}, {x: 0.5, y: 0.2}, {x: 0.5, y: 0.1}, {x: 0.1, y: 0.1}]
raster:
  blank: "#fafafa"
"##;
        let scene = Scene::from_yaml(yaml).unwrap();
        assert_eq!(scene.raster, Some(RasterSource::Blank(Rgb8::new(250, 250, 250))));
        assert_eq!(scene.crop, NormalizedRect::full());
        assert_eq!(scene.page.annotations[0].sub_type(), SubType::Highlight);
    }

    #[test]
    fn test_scene_rejects_empty_page() {
        let result = Scene::from_yaml("page: { width: 0, height: 100 }\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_scene_png_path_resolves_next_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(&path, "page: { width: 10, height: 10 }\nraster:\n  png: page.png\n").unwrap();

        let scene = Scene::load(&path).unwrap();
        assert_eq!(scene.raster, Some(RasterSource::Png(dir.path().join("page.png"))));
    }
}
