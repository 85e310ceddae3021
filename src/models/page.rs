//! The page collaborator: geometry plus everything drawn over the raster.

use bitflags::bitflags;
use pixel_recolor::Rgb8;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::annotation::Annotation;
use super::geometry::{NormalizedRect, Rotation};

/// Identifies the view a raster was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ObserverId(pub u32);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    /// Layers a paint call may draw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PaintFlags: u32 {
        const ACCESSIBILITY = 1;
        const ENHANCE_LINKS = 1 << 1;
        const ENHANCE_IMAGES = 1 << 2;
        const HIGHLIGHTS = 1 << 3;
        const TEXT_SELECTION = 1 << 4;
        const ANNOTATIONS = 1 << 5;
    }
}

/// Search result rectangles produced for one observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightAreaRect {
    pub observer: ObserverId,
    pub color: Rgb8,
    pub rects: Vec<NormalizedRect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSelection {
    pub color: Rgb8,
    pub rects: Vec<NormalizedRect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectRectKind {
    /// Link target
    Action,
    Image,
    SourceRef,
    Other,
}

/// An interactive region of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRect {
    pub kind: ObjectRectKind,
    pub rect: NormalizedRect,
}

/// A page as seen by the painter.
///
/// `width` and `height` are the displayed size in points, after rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub highlights: Vec<HighlightAreaRect>,
    #[serde(default)]
    pub text_selection: Option<TextSelection>,
    #[serde(default)]
    pub object_rects: Vec<ObjectRect>,
}

impl Page {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rotation: Rotation::Rotation0,
            annotations: Vec::new(),
            highlights: Vec::new(),
            text_selection: None,
            object_rects: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Height over width.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width > 0.0 {
            self.height / self.width
        } else {
            1.0
        }
    }

    /// Height in pixels for a raster `scaled_width` pixels wide.
    pub fn scaled_height_for(&self, scaled_width: u32) -> u32 {
        (scaled_width as f64 * self.aspect_ratio()).round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::new(612.0, 792.0);
        assert_eq!(page.rotation, Rotation::Rotation0);
        assert!(page.annotations.is_empty());
        assert!(page.text_selection.is_none());
        assert!((page.aspect_ratio() - 792.0 / 612.0).abs() < 1e-12);
        assert_eq!(page.scaled_height_for(612), 792);
    }

    #[test]
    fn test_paint_flags_from_names() {
        let flags: PaintFlags = serde_yaml::from_str("\"HIGHLIGHTS | ANNOTATIONS\"").unwrap();
        assert!(flags.contains(PaintFlags::HIGHLIGHTS | PaintFlags::ANNOTATIONS));
        assert!(!flags.contains(PaintFlags::ACCESSIBILITY));
    }

    #[test]
    fn test_page_deserialize_minimal() {
        let page: Page = serde_yaml::from_str("width: 100\nheight: 200\nrotation: 90\n").unwrap();
        assert_eq!(page.rotation, Rotation::Rotation90);
        assert_eq!(page.width, 100.0);
    }
}
