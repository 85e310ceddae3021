//! Vector geometry for highlight, ink and shape annotations.

use pixel_recolor::Rgb8;
use tiny_skia::Transform;

use super::shapes::{BlendMode, Brush, Pen, PenStyle, Primitive};
use crate::models::{
    GeomAnnotation, GeomType, HighlightAnnotation, HighlightType, InkAnnotation, LineStyle,
    NormalizedPoint, NormalizedRect, Rotation, Style,
};

/// Linked text notes are drawn as an icon of this many pixels.
pub const TEXT_ICON_SIZE: u32 = 24;

/// Width, in page points, of underline and strike-out strokes.
const MARKUP_STROKE_WIDTH: f32 = 2.0;

/// The stroke an annotation draws with: its color (yellow when unset),
/// opacity, width in points and dash style.
pub fn annotation_pen(style: &Style) -> Pen {
    let pen_style = match style.line_style {
        LineStyle::Dashed => PenStyle::Dashed,
        _ => PenStyle::Solid,
    };
    Pen::new(style.color_or(Rgb8::YELLOW), style.width as f32)
        .with_opacity(style.clamped_opacity() as f32)
        .with_style(pen_style)
}

/// Text markup over each quad.
///
/// Highlight fills the quad and Squiggly the quad with its bottom edge
/// pulled up to the middle, both multiplied into the page. Underline and
/// StrikeOut stroke a single line near the bottom edge or through the middle.
pub fn highlight_primitives(
    highlight: &HighlightAnnotation,
    style: &Style,
    rotation: Rotation,
    to_normalized_image: Transform,
) -> Vec<Primitive> {
    let color = style.color_or(Rgb8::YELLOW);
    let opacity = style.clamped_opacity() as f32;
    let brush = Brush::new(color).with_opacity(opacity);
    let pen = Pen::new(color, MARKUP_STROKE_WIDTH).with_opacity(opacity);

    highlight
        .transformed_quads(rotation)
        .into_iter()
        .map(|quad| {
            let [p0, p1, p2, p3] = quad.map(|p| p.mapped(&to_normalized_image));
            match highlight.highlight_type {
                HighlightType::Highlight => Primitive::path(vec![p0, p1, p2, p3], true)
                    .with_brush(Some(brush))
                    .with_blend(BlendMode::Multiply),
                HighlightType::Squiggly => {
                    let path = vec![p0, p1, p1.midpoint(p2), p0.midpoint(p3)];
                    Primitive::path(path, true)
                        .with_brush(Some(brush))
                        .with_blend(BlendMode::Multiply)
                }
                HighlightType::Underline => {
                    let path = vec![quarter_towards(p3, p0), quarter_towards(p2, p1)];
                    Primitive::path(path, false).with_pen(Some(pen.clone()))
                }
                HighlightType::StrikeOut => {
                    let path = vec![p0.midpoint(p3), p1.midpoint(p2)];
                    Primitive::path(path, false).with_pen(Some(pen.clone()))
                }
            }
        })
        .collect()
}

/// `(3a + b) / 4`
fn quarter_towards(a: NormalizedPoint, b: NormalizedPoint) -> NormalizedPoint {
    NormalizedPoint::new((3.0 * a.x + b.x) / 4.0, (3.0 * a.y + b.y) / 4.0)
}

/// One open stroke per ink path.
pub fn ink_primitives(
    ink: &InkAnnotation,
    style: &Style,
    rotation: Rotation,
    to_normalized_image: Transform,
) -> Vec<Primitive> {
    let pen = annotation_pen(style);
    ink.transformed_paths(rotation)
        .into_iter()
        .map(|path| {
            let path = path.iter().map(|p| p.mapped(&to_normalized_image)).collect();
            Primitive::path(path, false).with_pen(Some(pen.clone()))
        })
        .collect()
}

/// Square or circle shape inside `rect_px`, a pixel rectangle on a target
/// of `target_size` pixels.
///
/// The outline is inset by half the stroke width so it stays inside the
/// bounds; the inner fill is inset by the same amount again and drawn first.
pub fn geom_primitives(
    geom: &GeomAnnotation,
    style: &Style,
    rect_px: tiny_skia::Rect,
    page_scale: f32,
    target_size: (u32, u32),
) -> Vec<Primitive> {
    let stroke_px = (style.width as f32 * page_scale).max(0.0);
    if stroke_px <= 0.0 && geom.inner_color.is_none() {
        return Vec::new();
    }
    let half = stroke_px / 2.0;
    let opacity = style.clamped_opacity() as f32;
    let (tw, th) = (target_size.0.max(1) as f64, target_size.1.max(1) as f64);
    let inset = |d: f32| -> Option<NormalizedRect> {
        let r = NormalizedRect::new(
            (rect_px.left() + d) as f64 / tw,
            (rect_px.top() + d) as f64 / th,
            (rect_px.right() - d) as f64 / tw,
            (rect_px.bottom() - d) as f64 / th,
        );
        (!r.is_null()).then_some(r)
    };
    let shape = |r: NormalizedRect| match geom.geom_type {
        GeomType::Square => Primitive::path(
            vec![
                r.top_left(),
                NormalizedPoint::new(r.right, r.top),
                r.bottom_right(),
                NormalizedPoint::new(r.left, r.bottom),
            ],
            true,
        ),
        GeomType::Circle => Primitive::ellipse([r.top_left(), r.bottom_right()]),
    };

    let mut out = Vec::new();
    if let Some(inner) = geom.inner_color {
        if let Some(r) = inset(2.0 * half) {
            out.push(shape(r).with_brush(Some(Brush::new(inner).with_opacity(opacity))));
        }
    }
    if stroke_px > 0.0 {
        if let Some(r) = inset(half) {
            let pen = Pen {
                width: stroke_px,
                ..annotation_pen(style)
            };
            out.push(shape(r).with_pen(Some(pen)));
        }
    }
    out
}

/// Area a linked text note occupies on the page: an icon-sized box at the
/// top-left of its (rotated) bounds.
pub fn text_icon_rect(bounds: &NormalizedRect, page_width: f64, page_height: f64) -> NormalizedRect {
    let size = TEXT_ICON_SIZE as f64;
    NormalizedRect::new(
        bounds.left,
        bounds.top,
        bounds.left + size / page_width.max(1.0),
        bounds.top + size / page_height.max(1.0),
    )
}
