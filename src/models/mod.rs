pub mod annotation;
pub mod config;
pub mod geometry;
pub mod page;
pub mod scene;

pub use annotation::{
    Annotation, AnnotationFlags, AnnotationKind, GeomAnnotation, GeomType, HighlightAnnotation,
    HighlightType, InkAnnotation, InplaceAlignment, LineAnnotation, LineEffect, LineIntent,
    LineStyle, Quad, StampAnnotation, Style, SubType, TermStyle, TextAnnotation, TextIntent,
    TextType,
};
pub use config::{AccessibilityConfig, RenderConfig, RenderMode};
pub use geometry::{IntRect, NormalizedPoint, NormalizedRect, Rotation};
pub use page::{
    HighlightAreaRect, ObjectRect, ObjectRectKind, ObserverId, Page, PaintFlags, TextSelection,
};
pub use scene::{RasterSource, Scene};
