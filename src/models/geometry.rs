//! Normalized page geometry.
//!
//! Page content is addressed in coordinates relative to the page size, with
//! `(0, 0)` the top-left and `(1, 1)` the bottom-right corner. Pixel
//! rectangles only appear at the painting boundary.

use serde::{Deserialize, Serialize};
use tiny_skia::Transform;

/// A point in normalized page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map an unrotated point onto the rotated page.
    pub fn transformed(self, rotation: Rotation) -> Self {
        rotation.map(self)
    }

    /// Apply an affine transform (computed in `f32`, as tiny-skia does).
    pub fn mapped(self, transform: &Transform) -> Self {
        let (x, y) = (self.x as f32, self.y as f32);
        Self {
            x: (transform.sx * x + transform.kx * y + transform.tx) as f64,
            y: (transform.ky * x + transform.sy * y + transform.ty) as f64,
        }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// An axis-aligned rectangle in normalized page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl NormalizedRect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole page.
    pub const fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// True when the rectangle covers no area.
    pub fn is_null(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Strict overlap test: rectangles that only touch do not intersect.
    pub fn intersects(&self, other: &NormalizedRect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn intersected(&self, other: &NormalizedRect) -> Option<NormalizedRect> {
        if !self.intersects(other) {
            return None;
        }
        Some(NormalizedRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        })
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Pixel rectangle covering this area on a `width` x `height` raster.
    ///
    /// Left/top edges are floored and right/bottom edges ceiled, so the
    /// result always covers every touched pixel.
    pub fn geometry(&self, width: u32, height: u32) -> IntRect {
        let left = (self.left * width as f64).floor() as i32;
        let top = (self.top * height as f64).floor() as i32;
        let right = (self.right * width as f64).ceil() as i32;
        let bottom = (self.bottom * height as f64).ceil() as i32;
        IntRect::from_ltrb(left, top, right, bottom)
    }

    /// Normalize a pixel rectangle of a `width` x `height` raster.
    pub fn from_pixels(rect: IntRect, width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1) as f64, height.max(1) as f64);
        Self {
            left: rect.left as f64 / w,
            top: rect.top as f64 / h,
            right: rect.right() as f64 / w,
            bottom: rect.bottom() as f64 / h,
        }
    }

    /// Rotate the rectangle with the page, keeping it axis-aligned.
    pub fn transformed(&self, rotation: Rotation) -> Self {
        let a = rotation.map(NormalizedPoint::new(self.left, self.top));
        let b = rotation.map(NormalizedPoint::new(self.right, self.bottom));
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Smallest rectangle holding every point, `None` for no points.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = NormalizedPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            rect.left = rect.left.min(p.x);
            rect.top = rect.top.min(p.y);
            rect.right = rect.right.max(p.x);
            rect.bottom = rect.bottom.max(p.y);
        }
        Some(rect)
    }

    /// Smallest rectangle holding both.
    pub fn united(&self, other: &NormalizedRect) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn top_left(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.right, self.bottom)
    }
}

/// Page rotation, clockwise. Serialized as degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Rotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl Rotation {
    /// Map unrotated normalized coordinates to rotated ones.
    pub fn map(self, p: NormalizedPoint) -> NormalizedPoint {
        match self {
            Rotation::Rotation0 => p,
            Rotation::Rotation90 => NormalizedPoint::new(1.0 - p.y, p.x),
            Rotation::Rotation180 => NormalizedPoint::new(1.0 - p.x, 1.0 - p.y),
            Rotation::Rotation270 => NormalizedPoint::new(p.y, 1.0 - p.x),
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Rotation0 => 0,
            Rotation::Rotation90 => 90,
            Rotation::Rotation180 => 180,
            Rotation::Rotation270 => 270,
        }
    }
}

impl TryFrom<u32> for Rotation {
    type Error = String;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Rotation0),
            90 => Ok(Rotation::Rotation90),
            180 => Ok(Rotation::Rotation180),
            270 => Ok(Rotation::Rotation270),
            other => Err(format!("unsupported rotation: {other} degrees")),
        }
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle from edges; right/bottom are exclusive.
    pub fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlapping part; an empty rectangle when there is none.
    pub fn intersect(&self, other: &IntRect) -> IntRect {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return IntRect::default();
        }
        IntRect::from_ltrb(left, top, right, bottom)
    }

    pub fn intersects(&self, other: &IntRect) -> bool {
        !self.intersect(other).is_empty()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> IntRect {
        IntRect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Move each edge by the given amount (positive grows right/bottom).
    pub fn adjusted(&self, dl: i32, dt: i32, dr: i32, db: i32) -> IntRect {
        IntRect::from_ltrb(
            self.left + dl,
            self.top + dt,
            self.right() + dr,
            self.bottom() + db,
        )
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Float rectangle for tiny-skia, `None` when empty.
    pub fn to_rect(&self) -> Option<tiny_skia::Rect> {
        if self.is_empty() {
            return None;
        }
        tiny_skia::Rect::from_xywh(
            self.left as f32,
            self.top as f32,
            self.width as f32,
            self.height as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(a: NormalizedPoint, b: NormalizedPoint) {
        assert!(
            (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_rotation_mapping() {
        let p = NormalizedPoint::new(0.2, 0.1);
        assert_close(Rotation::Rotation0.map(p), p);
        assert_close(Rotation::Rotation90.map(p), NormalizedPoint::new(0.9, 0.2));
        assert_close(Rotation::Rotation180.map(p), NormalizedPoint::new(0.8, 0.9));
        assert_close(Rotation::Rotation270.map(p), NormalizedPoint::new(0.1, 0.8));
    }

    #[test]
    fn test_rotation_four_quarter_turns_is_identity() {
        let p = NormalizedPoint::new(0.25, 0.75);
        let mut q = p;
        for _ in 0..4 {
            q = Rotation::Rotation90.map(q);
        }
        assert_close(q, p);
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::try_from(270), Ok(Rotation::Rotation270));
        assert!(Rotation::try_from(45).is_err());
        assert_eq!(u32::from(Rotation::Rotation180), 180);
    }

    #[test]
    fn test_rect_transformed_stays_ordered() {
        let r = NormalizedRect::new(0.1, 0.2, 0.3, 0.6);
        let t = r.transformed(Rotation::Rotation90);
        assert!(t.left < t.right && t.top < t.bottom);
        assert!((t.left - 0.4).abs() < 1e-12);
        assert!((t.top - 0.1).abs() < 1e-12);
        assert!((t.right - 0.8).abs() < 1e-12);
        assert!((t.bottom - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = NormalizedRect::new(0.0, 0.0, 0.5, 0.5);
        let touching = NormalizedRect::new(0.5, 0.0, 1.0, 0.5);
        let overlapping = NormalizedRect::new(0.4, 0.4, 1.0, 1.0);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert_eq!(
            a.intersected(&overlapping),
            Some(NormalizedRect::new(0.4, 0.4, 0.5, 0.5))
        );
        assert_eq!(a.intersected(&touching), None);
    }

    #[test]
    fn test_geometry_covers_partial_pixels() {
        let r = NormalizedRect::new(0.101, 0.25, 0.499, 0.5);
        assert_eq!(r.geometry(100, 100), IntRect::new(10, 25, 40, 25));
    }

    #[test]
    fn test_from_pixels_roundtrip() {
        let px = IntRect::new(20, 10, 60, 30);
        let n = NormalizedRect::from_pixels(px, 200, 100);
        assert_eq!(n, NormalizedRect::new(0.1, 0.1, 0.4, 0.4));
        assert_eq!(n.geometry(200, 100), px);
    }

    #[test]
    fn test_bounding() {
        assert_eq!(NormalizedRect::bounding(Vec::new()), None);
        let r = NormalizedRect::bounding([
            NormalizedPoint::new(0.5, 0.2),
            NormalizedPoint::new(0.1, 0.9),
            NormalizedPoint::new(0.3, 0.4),
        ]);
        assert_eq!(r, Some(NormalizedRect::new(0.1, 0.2, 0.5, 0.9)));
    }

    #[test]
    fn test_is_null() {
        assert!(NormalizedRect::default().is_null());
        assert!(NormalizedRect::new(0.5, 0.1, 0.5, 0.9).is_null());
        assert!(!NormalizedRect::full().is_null());
    }

    #[test]
    fn test_int_rect_ops() {
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), IntRect::new(5, 5, 5, 5));
        assert!(a.intersect(&IntRect::new(10, 0, 5, 5)).is_empty());
        assert_eq!(a.translate(3, -2), IntRect::new(3, -2, 10, 10));
        assert_eq!(a.adjusted(-2, -2, 2, 2), IntRect::new(-2, -2, 14, 14));
        assert!(a.contains_point(9, 9));
        assert!(!a.contains_point(10, 9));
        assert!(IntRect::new(0, 0, 0, 4).to_rect().is_none());
    }

    #[test]
    fn test_point_mapped_through_transform() {
        let t = Transform::from_row(2.0, 0.0, 0.0, 4.0, 0.5, -1.0);
        let p = NormalizedPoint::new(0.25, 0.5).mapped(&t);
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }
}
