//! Rasterization of normalized vector paths.
//!
//! Paths are given in normalized image coordinates, fractions of the target
//! pixmap's width and height, and scaled to pixels here.

use pixel_recolor::Rgb8;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, PathBuilder, PixmapMut, Rect, Stroke, StrokeDash,
    Transform,
};

use crate::models::NormalizedPoint;

pub type NormalizedPath = Vec<NormalizedPoint>;

/// How drawn pixels combine with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source-over
    #[default]
    Normal,
    Multiply,
}

impl From<BlendMode> for tiny_skia::BlendMode {
    fn from(mode: BlendMode) -> Self {
        match mode {
            BlendMode::Normal => tiny_skia::BlendMode::SourceOver,
            BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenStyle {
    #[default]
    Solid,
    /// Dashes and gaps of three pen widths
    Dashed,
}

/// Stroke description. Caps are square and joins mitered.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Rgb8,
    pub opacity: f32,
    /// Width before the scale multiplier; 0 draws a one pixel hairline
    pub width: f32,
    pub style: PenStyle,
}

impl Pen {
    pub fn new(color: Rgb8, width: f32) -> Self {
        Self {
            color,
            opacity: 1.0,
            width,
            style: PenStyle::Solid,
        }
    }

    /// One pixel line regardless of scale.
    pub fn hairline(color: Rgb8) -> Self {
        Self::new(color, 0.0)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_style(mut self, style: PenStyle) -> Self {
        self.style = style;
        self
    }

    fn stroke(&self, scale_multiplier: f32) -> Stroke {
        let width = (self.width * scale_multiplier).max(0.0);
        let mut stroke = Stroke {
            width,
            line_cap: LineCap::Square,
            line_join: LineJoin::Miter,
            ..Stroke::default()
        };
        if self.style == PenStyle::Dashed {
            // Hairlines dash in whole pixels
            let unit = width.max(1.0);
            stroke.dash = StrokeDash::new(vec![3.0 * unit, 3.0 * unit], 0.0);
        }
        stroke
    }
}

/// Solid fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Rgb8,
    pub opacity: f32,
}

impl Brush {
    pub fn new(color: Rgb8) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

pub(crate) fn paint_for(color: Rgb8, opacity: f32, blend: BlendMode) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_sk_color(color, opacity));
    paint.blend_mode = blend.into();
    paint.anti_alias = true;
    paint
}

pub(crate) fn to_sk_color(color: Rgb8, opacity: f32) -> tiny_skia::Color {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, alpha)
}

/// Draw a polyline or polygon.
///
/// Without a brush the path is stroked as a polyline, closed by returning to
/// the first point when `close_shape` is set. With a brush it is filled with
/// the winding rule and then outlined. Returns whether anything was drawn;
/// paths with fewer than two points draw nothing.
#[allow(clippy::too_many_arguments)]
pub fn draw_shape(
    pixmap: &mut PixmapMut<'_>,
    path: &[NormalizedPoint],
    close_shape: bool,
    pen: Option<&Pen>,
    brush: Option<&Brush>,
    scale_multiplier: f32,
    blend: BlendMode,
    clip: Option<&Mask>,
) -> bool {
    if path.len() < 2 {
        return false;
    }
    let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
    let to_px = |p: &NormalizedPoint| (p.x as f32 * w, p.y as f32 * h);

    let mut builder = PathBuilder::new();
    let (x0, y0) = to_px(&path[0]);
    builder.move_to(x0, y0);
    for p in &path[1..] {
        let (x, y) = to_px(p);
        builder.line_to(x, y);
    }
    if close_shape {
        if brush.is_some() {
            builder.close();
        } else {
            builder.line_to(x0, y0);
        }
    }
    let Some(sk_path) = builder.finish() else {
        tracing::trace!(points = path.len(), "Skipping degenerate shape");
        return false;
    };

    let mut drawn = false;
    if let Some(brush) = brush {
        let paint = paint_for(brush.color, brush.opacity, blend);
        pixmap.fill_path(&sk_path, &paint, FillRule::Winding, Transform::identity(), clip);
        drawn = true;
    }
    if let Some(pen) = pen {
        let paint = paint_for(pen.color, pen.opacity, blend);
        let stroke = pen.stroke(scale_multiplier);
        pixmap.stroke_path(&sk_path, &paint, &stroke, Transform::identity(), clip);
        drawn = true;
    }
    drawn
}

/// Draw the ellipse inscribed in the rectangle spanned by two corners.
#[allow(clippy::too_many_arguments)]
pub fn draw_ellipse(
    pixmap: &mut PixmapMut<'_>,
    corners: &[NormalizedPoint],
    pen: Option<&Pen>,
    brush: Option<&Brush>,
    scale_multiplier: f32,
    blend: BlendMode,
    clip: Option<&Mask>,
) -> bool {
    let [a, b] = match corners {
        [a, b, ..] => [*a, *b],
        _ => return false,
    };
    let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
    let (x0, x1) = ((a.x as f32 * w), (b.x as f32 * w));
    let (y0, y1) = ((a.y as f32 * h), (b.y as f32 * h));
    let Some(rect) = Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)) else {
        return false;
    };
    let Some(oval) = PathBuilder::from_oval(rect) else {
        tracing::trace!(?rect, "Skipping degenerate ellipse");
        return false;
    };

    let mut drawn = false;
    if let Some(brush) = brush {
        let paint = paint_for(brush.color, brush.opacity, blend);
        pixmap.fill_path(&oval, &paint, FillRule::Winding, Transform::identity(), clip);
        drawn = true;
    }
    if let Some(pen) = pen {
        let paint = paint_for(pen.color, pen.opacity, blend);
        pixmap.stroke_path(&oval, &paint, &pen.stroke(scale_multiplier), Transform::identity(), clip);
        drawn = true;
    }
    drawn
}

/// Outline of a shape produced by the annotation geometry code.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Path { points: NormalizedPath, closed: bool },
    /// Ellipse inscribed in the rectangle spanned by two corners
    Ellipse { corners: [NormalizedPoint; 2] },
}

/// A shape together with how to paint it.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub outline: Outline,
    pub pen: Option<Pen>,
    pub brush: Option<Brush>,
    pub blend: BlendMode,
}

impl Primitive {
    pub fn path(points: NormalizedPath, closed: bool) -> Self {
        Self {
            outline: Outline::Path { points, closed },
            pen: None,
            brush: None,
            blend: BlendMode::Normal,
        }
    }

    pub fn ellipse(corners: [NormalizedPoint; 2]) -> Self {
        Self {
            outline: Outline::Ellipse { corners },
            pen: None,
            brush: None,
            blend: BlendMode::Normal,
        }
    }

    pub fn with_pen(mut self, pen: Option<Pen>) -> Self {
        self.pen = pen;
        self
    }

    pub fn with_brush(mut self, brush: Option<Brush>) -> Self {
        self.brush = brush;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    /// Points of a path outline, empty for ellipses.
    pub fn points(&self) -> &[NormalizedPoint] {
        match &self.outline {
            Outline::Path { points, .. } => points,
            Outline::Ellipse { .. } => &[],
        }
    }

    pub fn draw(&self, pixmap: &mut PixmapMut<'_>, scale_multiplier: f32, clip: Option<&Mask>) -> bool {
        match &self.outline {
            Outline::Path { points, closed } => draw_shape(
                pixmap,
                points,
                *closed,
                self.pen.as_ref(),
                self.brush.as_ref(),
                scale_multiplier,
                self.blend,
                clip,
            ),
            Outline::Ellipse { corners } => draw_ellipse(
                pixmap,
                corners,
                self.pen.as_ref(),
                self.brush.as_ref(),
                scale_multiplier,
                self.blend,
                clip,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Pixmap;

    fn white(size: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        pixmap
    }

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = pixmap.pixel(x, y).unwrap();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    fn pt(x: f64, y: f64) -> NormalizedPoint {
        NormalizedPoint::new(x, y)
    }

    #[test]
    fn test_draw_shape_needs_two_points() {
        let mut pixmap = white(10);
        let before = pixmap.clone();
        let pen = Pen::new(Rgb8::BLACK, 2.0);
        assert!(!draw_shape(&mut pixmap.as_mut(), &[], false, Some(&pen), None, 1.0, BlendMode::Normal, None));
        assert!(!draw_shape(
            &mut pixmap.as_mut(),
            &[pt(0.5, 0.5)],
            true,
            Some(&pen),
            Some(&Brush::new(Rgb8::BLACK)),
            1.0,
            BlendMode::Normal,
            None
        ));
        assert_eq!(pixmap.data(), before.data());
    }

    #[test]
    fn test_draw_shape_strokes_polyline() {
        let mut pixmap = white(20);
        let pen = Pen::new(Rgb8::new(255, 0, 0), 2.0);
        let drawn = draw_shape(
            &mut pixmap.as_mut(),
            &[pt(0.1, 0.5), pt(0.9, 0.5)],
            false,
            Some(&pen),
            None,
            1.0,
            BlendMode::Normal,
            None,
        );
        assert!(drawn);
        let [r, g, b, _] = rgba(&pixmap, 10, 9);
        assert!(r > 200 && g < 60 && b < 60, "line pixel is {r},{g},{b}");
        assert_eq!(rgba(&pixmap, 10, 3), [255, 255, 255, 255]);
    }

    #[test]
    fn test_draw_shape_fills_with_brush() {
        let mut pixmap = white(20);
        let square = [pt(0.25, 0.25), pt(0.75, 0.25), pt(0.75, 0.75), pt(0.25, 0.75)];
        let drawn = draw_shape(
            &mut pixmap.as_mut(),
            &square,
            true,
            None,
            Some(&Brush::new(Rgb8::new(0, 0, 255))),
            1.0,
            BlendMode::Normal,
            None,
        );
        assert!(drawn);
        assert_eq!(rgba(&pixmap, 10, 10), [0, 0, 255, 255]);
        assert_eq!(rgba(&pixmap, 1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_multiply_keeps_dark_pixels_dark() {
        let mut pixmap = white(10);
        // Left half black
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        pixmap.fill_rect(Rect::from_xywh(0.0, 0.0, 5.0, 10.0).unwrap(), &paint, Transform::identity(), None);

        let all = [pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0), pt(0.0, 1.0)];
        draw_shape(
            &mut pixmap.as_mut(),
            &all,
            true,
            None,
            Some(&Brush::new(Rgb8::YELLOW)),
            1.0,
            BlendMode::Multiply,
            None,
        );
        assert_eq!(rgba(&pixmap, 2, 5), [0, 0, 0, 255]);
        assert_eq!(rgba(&pixmap, 7, 5), [255, 255, 0, 255]);
    }

    #[test]
    fn test_draw_ellipse_fill_and_degenerate() {
        let mut pixmap = white(20);
        let brush = Brush::new(Rgb8::BLACK);
        assert!(draw_ellipse(
            &mut pixmap.as_mut(),
            &[pt(0.9, 0.9), pt(0.1, 0.1)],
            None,
            Some(&brush),
            1.0,
            BlendMode::Normal,
            None
        ));
        assert_eq!(rgba(&pixmap, 10, 10), [0, 0, 0, 255]);
        // Corners of the bounding box stay outside the ellipse
        assert_eq!(rgba(&pixmap, 3, 3), [255, 255, 255, 255]);

        assert!(!draw_ellipse(&mut pixmap.as_mut(), &[pt(0.5, 0.5)], None, Some(&brush), 1.0, BlendMode::Normal, None));
    }

    #[test]
    fn test_dashed_pen_leaves_gaps() {
        let mut pixmap = white(40);
        let pen = Pen::new(Rgb8::BLACK, 2.0).with_style(PenStyle::Dashed);
        draw_shape(
            &mut pixmap.as_mut(),
            &[pt(0.0, 0.5), pt(1.0, 0.5)],
            false,
            Some(&pen),
            None,
            1.0,
            BlendMode::Normal,
            None,
        );
        let row: Vec<u8> = (0..40).map(|x| rgba(&pixmap, x, 20)[0]).collect();
        assert!(row.iter().any(|&v| v < 64), "expected dashes: {row:?}");
        assert!(row.iter().any(|&v| v > 192), "expected gaps: {row:?}");
    }

    #[test]
    fn test_clip_mask_limits_drawing() {
        let mut pixmap = white(10);
        let mut mask = Mask::new(10, 10).unwrap();
        let left = PathBuilder::from_rect(Rect::from_xywh(0.0, 0.0, 5.0, 10.0).unwrap());
        mask.fill_path(&left, FillRule::Winding, false, Transform::identity());

        let all = [pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0), pt(0.0, 1.0)];
        draw_shape(
            &mut pixmap.as_mut(),
            &all,
            true,
            None,
            Some(&Brush::new(Rgb8::BLACK)),
            1.0,
            BlendMode::Normal,
            Some(&mask),
        );
        assert_eq!(rgba(&pixmap, 2, 5), [0, 0, 0, 255]);
        assert_eq!(rgba(&pixmap, 7, 5), [255, 255, 255, 255]);
    }
}
