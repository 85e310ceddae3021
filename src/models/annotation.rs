//! Annotation data model.
//!
//! Every annotation shares a common header (bounds, flags, style, texts) and
//! carries its subtype specific geometry in [`AnnotationKind`]. All geometry
//! is stored unrotated in normalized page coordinates; the `transformed_*`
//! accessors derive the rotated geometry on demand.

use bitflags::bitflags;
use pixel_recolor::Rgb8;
use serde::{Deserialize, Serialize};

use super::geometry::{NormalizedPoint, NormalizedRect, Rotation};

bitflags! {
    /// Annotation state and permission flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AnnotationFlags: u32 {
        const HIDDEN = 1;
        const FIXED_SIZE = 1 << 1;
        const FIXED_ROTATION = 1 << 2;
        const DENY_PRINT = 1 << 3;
        const DENY_WRITE = 1 << 4;
        const DENY_DELETE = 1 << 5;
        const TOGGLE_HIDING_ON_MOUSE = 1 << 6;
        const EXTERNAL = 1 << 7;
        /// Rendered by an interactive layer on top of the page
        const EXTERNALLY_DRAWN = 1 << 8;
        const BEING_MOVED = 1 << 9;
        const BEING_RESIZED = 1 << 10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Beveled,
    Inset,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEffect {
    #[default]
    NoEffect,
    Cloudy,
}

/// Drawing style shared by all annotation kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// `None` selects the subtype default color
    pub color: Option<Rgb8>,
    pub opacity: f64,
    /// Stroke width in page points
    pub width: f64,
    pub line_style: LineStyle,
    pub x_corners: f64,
    pub y_corners: f64,
    pub dash_marks: u32,
    pub dash_spaces: u32,
    pub line_effect: LineEffect,
    pub effect_intensity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: None,
            opacity: 1.0,
            width: 1.0,
            line_style: LineStyle::Solid,
            x_corners: 0.0,
            y_corners: 0.0,
            dash_marks: 3,
            dash_spaces: 0,
            line_effect: LineEffect::NoEffect,
            effect_intensity: 1.0,
        }
    }
}

impl Style {
    /// The annotation color, or `fallback` when none is set.
    pub fn color_or(&self, fallback: Rgb8) -> Rgb8 {
        self.color.unwrap_or(fallback)
    }

    /// Opacity clamped to `0.0..=1.0`.
    pub fn clamped_opacity(&self) -> f64 {
        self.opacity.clamp(0.0, 1.0)
    }
}

/// An annotation placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unrotated bounds holding every piece of geometry
    pub bounding_rect: NormalizedRect,
    #[serde(default)]
    pub flags: AnnotationFlags,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub author: String,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, bounding_rect: NormalizedRect) -> Self {
        Self {
            bounding_rect,
            flags: AnnotationFlags::empty(),
            style: Style::default(),
            contents: String::new(),
            author: String::new(),
            kind,
        }
    }

    /// Build an annotation whose bounds are fitted to its geometry.
    ///
    /// Kinds without geometry (text, stamps, shapes) get `fallback` bounds.
    pub fn fitted(kind: AnnotationKind, fallback: NormalizedRect) -> Self {
        let bounds = kind.geometry_bounds().unwrap_or(fallback);
        Self::new(kind, bounds)
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_flags(mut self, flags: AnnotationFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    pub fn sub_type(&self) -> SubType {
        self.kind.sub_type()
    }

    pub fn transformed_bounding_rect(&self, rotation: Rotation) -> NormalizedRect {
        self.bounding_rect.transformed(rotation)
    }
}

/// Fieldless subtype tag, for routing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubType {
    Text,
    Line,
    Geom,
    Highlight,
    Stamp,
    Ink,
    Caret,
    FileAttachment,
    Sound,
    Movie,
    Widget,
    Screen,
    RichMedia,
}

/// Subtype specific annotation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationKind {
    Text(TextAnnotation),
    Line(LineAnnotation),
    Geom(GeomAnnotation),
    Highlight(HighlightAnnotation),
    Stamp(StampAnnotation),
    Ink(InkAnnotation),
    Caret,
    FileAttachment,
    Sound,
    Movie,
    Widget,
    Screen,
    RichMedia,
}

impl AnnotationKind {
    pub fn sub_type(&self) -> SubType {
        match self {
            AnnotationKind::Text(_) => SubType::Text,
            AnnotationKind::Line(_) => SubType::Line,
            AnnotationKind::Geom(_) => SubType::Geom,
            AnnotationKind::Highlight(_) => SubType::Highlight,
            AnnotationKind::Stamp(_) => SubType::Stamp,
            AnnotationKind::Ink(_) => SubType::Ink,
            AnnotationKind::Caret => SubType::Caret,
            AnnotationKind::FileAttachment => SubType::FileAttachment,
            AnnotationKind::Sound => SubType::Sound,
            AnnotationKind::Movie => SubType::Movie,
            AnnotationKind::Widget => SubType::Widget,
            AnnotationKind::Screen => SubType::Screen,
            AnnotationKind::RichMedia => SubType::RichMedia,
        }
    }

    /// Bounds of the point geometry, for kinds that carry points.
    pub fn geometry_bounds(&self) -> Option<NormalizedRect> {
        match self {
            AnnotationKind::Line(line) => NormalizedRect::bounding(line.points.iter().copied()),
            AnnotationKind::Highlight(h) => {
                NormalizedRect::bounding(h.quads.iter().flat_map(|q| q.points))
            }
            AnnotationKind::Ink(ink) => {
                NormalizedRect::bounding(ink.paths().iter().flatten().copied())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    /// Popup note shown as an icon
    #[default]
    Linked,
    /// Text drawn directly on the page
    InPlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InplaceAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextIntent {
    #[default]
    Unknown,
    FreeText,
    FreeTextCallout,
    FreeTextTypeWriter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnnotation {
    pub text_type: TextType,
    /// Icon name for linked notes
    pub icon: String,
    /// Font size in page points
    pub font_size: f64,
    pub text_color: Option<Rgb8>,
    pub inplace_alignment: InplaceAlignment,
    pub callout_points: [NormalizedPoint; 3],
    pub intent: TextIntent,
}

impl Default for TextAnnotation {
    fn default() -> Self {
        Self {
            text_type: TextType::Linked,
            icon: "Note".to_string(),
            font_size: 10.0,
            text_color: None,
            inplace_alignment: InplaceAlignment::Left,
            callout_points: [NormalizedPoint::default(); 3],
            intent: TextIntent::Unknown,
        }
    }
}

/// Line terminator glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermStyle {
    Square,
    Circle,
    Diamond,
    OpenArrow,
    ClosedArrow,
    #[default]
    None,
    Butt,
    #[serde(rename = "r_open_arrow")]
    ROpenArrow,
    #[serde(rename = "r_closed_arrow")]
    RClosedArrow,
    Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineIntent {
    #[default]
    Unknown,
    Arrow,
    Dimension,
    PolygonCloud,
}

/// Straight line, polyline or polygon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineAnnotation {
    pub points: Vec<NormalizedPoint>,
    pub start_style: TermStyle,
    pub end_style: TermStyle,
    pub closed: bool,
    pub inner_color: Option<Rgb8>,
    /// Leader line length in page points
    pub leading_forward: f64,
    /// Leader line extension in page points
    pub leading_backward: f64,
    pub show_caption: bool,
    pub intent: LineIntent,
}

impl LineAnnotation {
    /// Two point line between `start` and `end`.
    pub fn segment(start: NormalizedPoint, end: NormalizedPoint) -> Self {
        Self {
            points: vec![start, end],
            ..Default::default()
        }
    }

    pub fn transformed_points(&self, rotation: Rotation) -> Vec<NormalizedPoint> {
        self.points.iter().map(|p| p.transformed(rotation)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeomType {
    #[default]
    Square,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeomAnnotation {
    pub geom_type: GeomType,
    pub inner_color: Option<Rgb8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightType {
    #[default]
    Highlight,
    Squiggly,
    Underline,
    StrikeOut,
}

/// One marked text run.
///
/// Points 0 and 1 lie on the baseline edge, 2 and 3 on the top edge, so
/// `0-3` and `1-2` are the side edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quad {
    pub points: [NormalizedPoint; 4],
    #[serde(default)]
    pub cap_start: bool,
    #[serde(default)]
    pub cap_end: bool,
    #[serde(default)]
    pub feather: f64,
}

impl Quad {
    pub fn new(points: [NormalizedPoint; 4]) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    /// Quad covering `rect`, baseline at the bottom.
    pub fn from_rect(rect: NormalizedRect) -> Self {
        Self::new([
            NormalizedPoint::new(rect.left, rect.bottom),
            NormalizedPoint::new(rect.right, rect.bottom),
            NormalizedPoint::new(rect.right, rect.top),
            NormalizedPoint::new(rect.left, rect.top),
        ])
    }

    pub fn transformed(&self, rotation: Rotation) -> [NormalizedPoint; 4] {
        self.points.map(|p| p.transformed(rotation))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightAnnotation {
    pub highlight_type: HighlightType,
    pub quads: Vec<Quad>,
}

impl HighlightAnnotation {
    pub fn new(highlight_type: HighlightType, quads: Vec<Quad>) -> Self {
        Self {
            highlight_type,
            quads,
        }
    }

    pub fn transformed_quads(&self, rotation: Rotation) -> Vec<[NormalizedPoint; 4]> {
        self.quads.iter().map(|q| q.transformed(rotation)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampAnnotation {
    pub icon_name: String,
}

impl Default for StampAnnotation {
    fn default() -> Self {
        Self {
            icon_name: "Draft".to_string(),
        }
    }
}

/// Freehand strokes.
///
/// Sub-paths shorter than two points cannot be stroked and are dropped when
/// the annotation is built, so every stored path is drawable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "InkPaths", into = "InkPaths")]
pub struct InkAnnotation {
    paths: Vec<Vec<NormalizedPoint>>,
}

impl InkAnnotation {
    pub fn new(paths: Vec<Vec<NormalizedPoint>>) -> Self {
        let before = paths.len();
        let paths: Vec<_> = paths.into_iter().filter(|p| p.len() >= 2).collect();
        if paths.len() != before {
            tracing::trace!(dropped = before - paths.len(), "Dropped short ink paths");
        }
        Self { paths }
    }

    /// Append a stroke; returns `false` when it was too short to keep.
    pub fn add_path(&mut self, path: Vec<NormalizedPoint>) -> bool {
        if path.len() < 2 {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn paths(&self) -> &[Vec<NormalizedPoint>] {
        &self.paths
    }

    pub fn transformed_paths(&self, rotation: Rotation) -> Vec<Vec<NormalizedPoint>> {
        self.paths
            .iter()
            .map(|path| path.iter().map(|p| p.transformed(rotation)).collect())
            .collect()
    }
}

/// Serialized shape of [`InkAnnotation`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InkPaths {
    #[serde(default)]
    paths: Vec<Vec<NormalizedPoint>>,
}

impl From<InkPaths> for InkAnnotation {
    fn from(raw: InkPaths) -> Self {
        InkAnnotation::new(raw.paths)
    }
}

impl From<InkAnnotation> for InkPaths {
    fn from(ink: InkAnnotation) -> Self {
        InkPaths { paths: ink.paths }
    }
}
