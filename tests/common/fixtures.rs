//! Test fixtures: pages, rasters and annotations.

use pagepaint::models::{
    Annotation, AnnotationKind, HighlightAnnotation, HighlightType, LineAnnotation,
    NormalizedPoint, NormalizedRect, Quad, Style, TermStyle,
};
use pixel_recolor::Rgb8;
use tiny_skia::Pixmap;

pub const RED: Rgb8 = Rgb8::new(255, 0, 0);

pub fn pt(x: f64, y: f64) -> NormalizedPoint {
    NormalizedPoint::new(x, y)
}

/// Solid color style of the given pen width
pub fn solid(color: Rgb8, width: f64) -> Style {
    Style {
        color: Some(color),
        width,
        ..Style::default()
    }
}

/// Straight line annotation with the given end terminator
pub fn line(from: NormalizedPoint, to: NormalizedPoint, end: TermStyle, style: Style) -> Annotation {
    let line = LineAnnotation {
        end_style: end,
        ..LineAnnotation::segment(from, to)
    };
    Annotation::fitted(AnnotationKind::Line(line), NormalizedRect::full()).with_style(style)
}

/// Text markup over a single quad
pub fn markup(highlight_type: HighlightType, points: [NormalizedPoint; 4], style: Style) -> Annotation {
    let highlight = HighlightAnnotation::new(highlight_type, vec![Quad::new(points)]);
    Annotation::fitted(AnnotationKind::Highlight(highlight), NormalizedRect::full()).with_style(style)
}

/// Opaque raster with a hue gradient across and a value gradient down
pub fn color_gradient(width: u32, height: u32) -> Pixmap {
    let mut pixmap = Pixmap::new(width, height).expect("Failed to allocate raster");
    let data = pixmap.data_mut();
    for y in 0..height {
        for x in 0..width {
            let i = ((y * width + x) * 4) as usize;
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = 255 - r / 2;
            data[i..i + 4].copy_from_slice(&[r, g, b, 255]);
        }
    }
    pixmap
}
