//! Asset loading with embedded fallbacks
//!
//! Icons (text note glyphs, stamps, the busy placeholder) and the default
//! config are compiled into the binary. An optional icons directory on disk
//! overrides embedded icons file by file:
//!
//! - If no icons directory is configured: use embedded assets only
//! - If one is configured: use filesystem files where present, embedded otherwise

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded SVG icons
#[derive(RustEmbed)]
#[folder = "icons/"]
#[include = "*.svg"]
#[include = "**/*.svg"]
struct EmbeddedIcons;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Icons,
    Config,
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External icons directory
    icons_dir: Option<PathBuf>,
    /// External config file path
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// With `None` paths only embedded assets are used.
    pub fn new(icons_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            icons_dir,
            config_file,
        }
    }

    /// Loader over the embedded assets only
    pub fn embedded() -> Self {
        Self::default()
    }

    /// Read an icon by its path relative to the icons root
    /// (e.g. `note.svg`, `stamps/approved.svg`).
    pub fn read_icon(&self, relative_path: &Path) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref dir) = self.icons_dir {
            let full_path = dir.join(relative_path);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading icon from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        let path_str = relative_path.to_string_lossy().replace('\\', "/");
        EmbeddedIcons::get(&path_str)
            .map(|f| {
                tracing::trace!(path = %path_str, "Loading icon from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("Icon not found: {path_str}"))
            })
    }

    /// Whether an icon exists on disk or embedded
    pub fn has_icon(&self, relative_path: &Path) -> bool {
        if let Some(ref dir) = self.icons_dir {
            if dir.join(relative_path).exists() {
                return true;
            }
        }
        EmbeddedIcons::get(&relative_path.to_string_lossy().replace('\\', "/")).is_some()
    }

    /// List all available icons (merged view of embedded + external)
    pub fn list_icons(&self) -> Vec<String> {
        let mut files: BTreeSet<String> = EmbeddedIcons::iter().map(|s| s.to_string()).collect();

        if let Some(ref dir) = self.icons_dir {
            collect_svgs(dir, Path::new(""), &mut files);
        }

        files.into_iter().collect()
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to the embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Extract embedded assets to filesystem (init command)
    ///
    /// Uses the configured paths (or defaults if not set).
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Icons => {
                    let dir = self
                        .icons_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./icons"));
                    fs::create_dir_all(&dir)?;

                    for file in EmbeddedIcons::iter() {
                        let path = dir.join(file.as_ref());
                        if !force && path.exists() {
                            report.skipped.push(path.display().to_string());
                            continue;
                        }
                        if let Some(data) = EmbeddedIcons::get(&file) {
                            // Stamps live in a subdirectory
                            if let Some(parent) = path.parent() {
                                fs::create_dir_all(parent)?;
                            }
                            fs::write(&path, &*data.data)?;
                            report.written.push(path.display().to_string());
                        }
                    }
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml"));

                    if !force && path.exists() {
                        report.skipped.push(path.display().to_string());
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    if let Some(data) = EmbeddedConfig::get("config.yaml") {
                        fs::write(&path, &*data.data)?;
                        report.written.push(path.display().to_string());
                    }
                }
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Icons => EmbeddedIcons::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}

fn collect_svgs(root: &Path, relative: &Path, out: &mut BTreeSet<String>) {
    let Ok(entries) = fs::read_dir(root.join(relative)) else {
        return;
    };
    for entry in entries.flatten() {
        let rel = relative.join(entry.file_name());
        let path = entry.path();
        if path.is_dir() {
            collect_svgs(root, &rel, out);
        } else if path.extension().is_some_and(|ext| ext == "svg") {
            out.insert(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_icons_present() {
        let loader = AssetLoader::embedded();
        let icons = loader.list_icons();
        assert!(icons.contains(&"note.svg".to_string()));
        assert!(icons.contains(&"busy.svg".to_string()));
        assert!(icons.contains(&"stamps/generic.svg".to_string()));
        assert!(loader.read_icon(Path::new("note.svg")).is_ok());
    }

    #[test]
    fn test_missing_icon_is_not_found() {
        let loader = AssetLoader::embedded();
        let err = loader.read_icon(Path::new("nope.svg")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!loader.has_icon(Path::new("nope.svg")));
    }

    #[test]
    fn test_filesystem_icon_overrides_embedded() {
        let dir = TempDir::new().unwrap();
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#;
        fs::write(dir.path().join("note.svg"), svg).unwrap();
        fs::write(dir.path().join("extra.svg"), svg).unwrap();

        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);
        assert_eq!(&*loader.read_icon(Path::new("note.svg")).unwrap(), &svg[..]);
        assert!(loader.list_icons().contains(&"extra.svg".to_string()));
        // Embedded icons still fall through
        assert!(loader.read_icon(Path::new("busy.svg")).is_ok());
    }

    #[test]
    fn test_embedded_config_parses() {
        let text = AssetLoader::embedded().read_config_string().unwrap();
        assert!(crate::models::RenderConfig::from_yaml(&text).is_ok());
    }

    #[test]
    fn test_init_writes_then_skips() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        let loader = AssetLoader::new(None, Some(config.clone()));

        let first = loader.init(&[AssetCategory::Config], false).unwrap();
        assert_eq!(first.written.len(), 1);
        assert!(config.exists());

        let second = loader.init(&[AssetCategory::Config], false).unwrap();
        assert!(second.written.is_empty());
        assert_eq!(second.skipped.len(), 1);

        let forced = loader.init(&[AssetCategory::Config], true).unwrap();
        assert_eq!(forced.written.len(), 1);
    }
}
