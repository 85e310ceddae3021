//! Vector geometry for line annotations.
//!
//! A two point line is built in a local frame: the x axis runs along the
//! segment from the first point, lengths are measured in page widths, and
//! the y axis is scaled by the page aspect ratio so terminator glyphs keep
//! their shape on non-square pages. Lines with more points are drawn as
//! plain polylines or polygons.

use tiny_skia::Transform;

use super::annotation_paths::annotation_pen;
use super::shapes::{Brush, Pen, Primitive};
use crate::models::{LineAnnotation, NormalizedPoint, Rotation, Style, TermStyle};

/// How far the main segment is pulled back from an end with this terminator.
pub fn shorten_for_arrow(size: f64, style: TermStyle) -> f64 {
    match style {
        TermStyle::Square | TermStyle::Circle | TermStyle::Diamond | TermStyle::ClosedArrow => size,
        TermStyle::OpenArrow
        | TermStyle::None
        | TermStyle::Butt
        | TermStyle::ROpenArrow
        | TermStyle::RClosedArrow
        | TermStyle::Slash => 0.0,
    }
}

/// A terminator glyph in local line coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminatorShape {
    Polyline {
        points: Vec<NormalizedPoint>,
        closed: bool,
    },
    /// Circle of radius `|size| / 2` centered on the segment
    Circle { center_x: f64, size: f64 },
}

/// Glyph for `style` drawn at `x`, pointing along +x for a positive `size`.
pub fn terminator_shape(style: TermStyle, x: f64, size: f64) -> Option<TerminatorShape> {
    let half = size / 2.0;
    let p = NormalizedPoint::new;
    let shape = match style {
        TermStyle::None => return None,
        TermStyle::Square => TerminatorShape::Polyline {
            points: vec![p(x, half), p(x - size, half), p(x - size, -half), p(x, -half)],
            closed: true,
        },
        TermStyle::Circle => TerminatorShape::Circle {
            center_x: x - half,
            size,
        },
        TermStyle::Diamond => TerminatorShape::Polyline {
            points: vec![p(x, 0.0), p(x - half, half), p(x - size, 0.0), p(x - half, -half)],
            closed: true,
        },
        TermStyle::OpenArrow | TermStyle::ROpenArrow => TerminatorShape::Polyline {
            points: arrow(x, size),
            closed: false,
        },
        TermStyle::ClosedArrow | TermStyle::RClosedArrow => TerminatorShape::Polyline {
            points: arrow(x, size),
            closed: true,
        },
        TermStyle::Butt => TerminatorShape::Polyline {
            points: vec![p(x, half), p(x, -half)],
            closed: false,
        },
        TermStyle::Slash => {
            let x_offset = 60f64.to_radians().cos() * half;
            TerminatorShape::Polyline {
                points: vec![p(x - x_offset, half), p(x + x_offset, -half)],
                closed: false,
            }
        }
    };
    Some(shape)
}

fn arrow(x: f64, size: f64) -> Vec<NormalizedPoint> {
    vec![
        NormalizedPoint::new(x - size, size / 2.0),
        NormalizedPoint::new(x, 0.0),
        NormalizedPoint::new(x - size, -size / 2.0),
    ]
}

/// Signed glyph size for the start of the line.
///
/// Glyphs at the start face backwards, except the butt tick (symmetric) and
/// the reversed arrows, which face forward there.
fn start_size(style: TermStyle, size: f64) -> f64 {
    match style {
        TermStyle::Butt | TermStyle::ROpenArrow | TermStyle::RClosedArrow => size,
        _ => -size,
    }
}

/// Signed glyph size for the end of the line.
fn end_size(style: TermStyle, size: f64) -> f64 {
    match style {
        TermStyle::ROpenArrow | TermStyle::RClosedArrow => -size,
        _ => size,
    }
}

/// Builds the primitives of one line annotation.
pub struct LinePainter<'a> {
    line: &'a LineAnnotation,
    points: Vec<NormalizedPoint>,
    page_width: f64,
    page_height: f64,
    aspect_ratio: f64,
    pen: Pen,
    fill: Option<Brush>,
    /// Fill of closed terminators
    glyph_fill: Brush,
    to_normalized_image: Transform,
}

impl<'a> LinePainter<'a> {
    /// `page_size` is the displayed page size in points and
    /// `to_normalized_image` maps rotated page coordinates onto the target.
    pub fn new(
        line: &'a LineAnnotation,
        style: &Style,
        rotation: Rotation,
        page_size: (f64, f64),
        to_normalized_image: Transform,
    ) -> Self {
        let (page_width, page_height) = page_size;
        let pen = annotation_pen(style);
        let opacity = pen.opacity;
        let color = pen.color;

        let points = line.transformed_points(rotation);
        let fill = line
            .inner_color
            .filter(|_| line.closed || points.len() == 2)
            .map(|c| Brush::new(c).with_opacity(opacity));
        let glyph_fill = fill.unwrap_or(Brush::new(color).with_opacity(opacity));

        Self {
            line,
            points,
            page_width,
            page_height,
            aspect_ratio: if page_width > 0.0 {
                page_height / page_width
            } else {
                1.0
            },
            pen,
            fill,
            glyph_fill,
            to_normalized_image,
        }
    }

    /// Paths to draw, in normalized image coordinates.
    pub fn primitives(&self) -> Vec<Primitive> {
        match self.points.len() {
            0 | 1 => {
                tracing::trace!(points = self.points.len(), "Skipping line without a segment");
                Vec::new()
            }
            2 => self.segment_primitives(),
            _ => {
                let path = self
                    .points
                    .iter()
                    .map(|p| p.mapped(&self.to_normalized_image))
                    .collect();
                vec![Primitive::path(path, self.line.closed)
                    .with_pen(Some(self.pen.clone()))
                    .with_brush(self.fill)]
            }
        }
    }

    /// Local frame of the segment and its length in page widths.
    fn local_frame(&self) -> (Transform, f64) {
        let (p0, p1) = (self.points[0], self.points[1]);
        let dx = p1.x - p0.x;
        let dy = p0.y - p1.y;
        let aspect = self.aspect_ratio;
        let angle = (dy * aspect).atan2(dx);
        let (sin, cos) = (-angle).sin_cos();
        let local = Transform::from_row(
            cos as f32,
            (sin / aspect) as f32,
            -sin as f32,
            (cos / aspect) as f32,
            p0.x as f32,
            p0.y as f32,
        );
        let length = (dx * dx + (dy * aspect) * (dy * aspect)).sqrt();
        (local, length)
    }

    fn segment_primitives(&self) -> Vec<Primitive> {
        let (local, length) = self.local_frame();
        let combined = local.post_concat(self.to_normalized_image);
        let size = if self.page_width > 0.0 {
            (6.0 * self.pen.width as f64 / self.page_width).min(length / 2.0)
        } else {
            length / 2.0
        };
        let to_image = |pts: &[NormalizedPoint]| -> Vec<NormalizedPoint> {
            pts.iter().map(|p| p.mapped(&combined)).collect()
        };

        let mut out = Vec::new();

        // Main segment, pulled back where a glyph covers the end
        let start = shorten_for_arrow(size, self.line.start_style);
        let end = length - shorten_for_arrow(size, self.line.end_style);
        let segment = [NormalizedPoint::new(start, 0.0), NormalizedPoint::new(end, 0.0)];
        out.push(Primitive::path(to_image(&segment), false).with_pen(Some(self.pen.clone())));

        let ends = [
            (self.line.start_style, 0.0, start_size(self.line.start_style, size)),
            (self.line.end_style, length, end_size(self.line.end_style, size)),
        ];
        for (style, x, signed_size) in ends {
            let Some(shape) = terminator_shape(style, x, signed_size) else {
                continue;
            };
            let primitive = match shape {
                TerminatorShape::Polyline { points, closed } => {
                    let brush = closed.then_some(self.glyph_fill);
                    Primitive::path(to_image(&points), closed).with_brush(brush)
                }
                TerminatorShape::Circle { center_x, size } => {
                    let center = NormalizedPoint::new(center_x, 0.0).mapped(&local);
                    let r = size.abs() / 2.0;
                    let corners = [
                        NormalizedPoint::new(center.x - r, center.y - r / self.aspect_ratio),
                        NormalizedPoint::new(center.x + r, center.y + r / self.aspect_ratio),
                    ]
                    .map(|p| p.mapped(&self.to_normalized_image));
                    Primitive::ellipse(corners).with_brush(Some(self.glyph_fill))
                }
            };
            out.push(primitive.with_pen(Some(self.pen.clone())));
        }

        for x in [0.0, length] {
            if let Some(path) = self.leader_line(x) {
                out.push(Primitive::path(to_image(&path), false).with_pen(Some(self.pen.clone())));
            }
        }
        out
    }

    /// Leader line at `x`, in local coordinates.
    fn leader_line(&self, x: f64) -> Option<Vec<NormalizedPoint>> {
        if self.page_height <= 0.0 {
            return None;
        }
        let ll = self.aspect_ratio * self.line.leading_forward / self.page_height;
        let lle = self.aspect_ratio * self.line.leading_backward / self.page_height;
        if ll.abs() <= 0.0 {
            return None;
        }
        let sign = if ll > 0.0 { -1.0 } else { 1.0 };
        let to = if lle.abs() > 0.0 { sign * lle } else { 0.0 };
        Some(vec![NormalizedPoint::new(x, ll), NormalizedPoint::new(x, to)])
    }
}
