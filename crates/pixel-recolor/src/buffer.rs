//! Pixel buffer with an explicit alpha format.
//!
//! [`PixelBuffer`] owns RGBA8 bytes in row-major order (`stride = width * 4`)
//! and records whether the color channels are premultiplied. Transforms call
//! [`PixelBuffer::ensure_premultiplied()`] before touching pixels, so the
//! conversion happens exactly once, at the boundary.

use crate::error::BufferError;

/// Alpha layout of the bytes in a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Straight (unassociated) alpha, as produced by most image decoders
    Rgba8,
    /// Color channels already multiplied by alpha; required by all transforms
    Rgba8Premultiplied,
}

/// An RGBA8 image buffer.
///
/// # Invariant
///
/// Once [`ensure_premultiplied()`](Self::ensure_premultiplied) has run, every
/// pixel satisfies `r, g, b <= a`. All transforms preserve this.
///
/// # Example
///
/// ```
/// use pixel_recolor::{PixelBuffer, PixelFormat};
///
/// // A half transparent white pixel with straight alpha
/// let mut buffer = PixelBuffer::new(1, 1, PixelFormat::Rgba8, vec![255, 255, 255, 128]).unwrap();
/// buffer.ensure_premultiplied();
/// assert_eq!(buffer.format(), PixelFormat::Rgba8Premultiplied);
/// assert_eq!(buffer.pixel(0, 0), [128, 128, 128, 128]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// Physical pixels per logical pixel (HiDPI)
    device_scale: f32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes.
    ///
    /// Fails when a dimension is zero or `data.len() != width * height * 4`.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            device_scale: 1.0,
            format,
            data,
        })
    }

    /// Wrap bytes that are already premultiplied (e.g. a tiny-skia pixmap).
    #[inline]
    pub fn from_premultiplied(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        Self::new(width, height, PixelFormat::Rgba8Premultiplied, data)
    }

    /// Set the device pixel ratio recorded with the buffer.
    #[inline]
    pub fn with_device_scale(mut self, scale: f32) -> Self {
        self.device_scale = scale;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    #[inline]
    pub fn device_scale(&self) -> f32 {
        self.device_scale
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Give the bytes back, e.g. to rebuild a pixmap without copying.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA bytes of one pixel, in the buffer's current format.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let offset = y as usize * self.stride() + x as usize * 4;
        let px = &self.data[offset..offset + 4];
        [px[0], px[1], px[2], px[3]]
    }

    /// Convert straight alpha to premultiplied alpha in place.
    ///
    /// Does nothing when the buffer is already premultiplied.
    pub fn ensure_premultiplied(&mut self) {
        if self.format == PixelFormat::Rgba8Premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3];
            if a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = premultiply(*c, a);
            }
        }
        self.format = PixelFormat::Rgba8Premultiplied;
    }

    /// Apply `f` to the straight RGB of every visible pixel.
    ///
    /// Opaque pixels are passed through as they are; partially transparent
    /// ones are unpremultiplied first and premultiplied again afterwards.
    /// Fully transparent pixels are skipped. Alpha never changes.
    pub(crate) fn map_rgb<F>(&mut self, mut f: F)
    where
        F: FnMut(u8, u8, u8) -> [u8; 3],
    {
        if !self.check_premultiplied() {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3];
            match a {
                0 => {}
                255 => {
                    let out = f(px[0], px[1], px[2]);
                    px[..3].copy_from_slice(&out);
                }
                _ => {
                    let out = f(
                        unpremultiply(px[0], a),
                        unpremultiply(px[1], a),
                        unpremultiply(px[2], a),
                    );
                    for (dst, src) in px[..3].iter_mut().zip(out) {
                        *dst = premultiply(src, a);
                    }
                }
            }
        }
    }

    /// Apply `f` to the raw premultiplied bytes `[r, g, b, a]` of every pixel.
    pub(crate) fn map_premultiplied<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut [u8]),
    {
        if !self.check_premultiplied() {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            f(px);
        }
    }

    fn check_premultiplied(&mut self) -> bool {
        self.ensure_premultiplied();
        let ok = self.format == PixelFormat::Rgba8Premultiplied;
        debug_assert!(ok, "pixel buffer is not premultiplied after conversion");
        ok
    }
}

#[inline]
fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u32 * a as u32 + 127) / 255) as u8
}

#[inline]
fn unpremultiply(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert_eq!(
            PixelBuffer::new(2, 2, PixelFormat::Rgba8, vec![0; 12]),
            Err(BufferError::LengthMismatch {
                expected: 16,
                actual: 12
            })
        );
        assert_eq!(
            PixelBuffer::new(0, 2, PixelFormat::Rgba8, vec![]),
            Err(BufferError::EmptyDimensions {
                width: 0,
                height: 2
            })
        );
        let buffer = PixelBuffer::new(2, 3, PixelFormat::Rgba8, vec![0; 24]).unwrap();
        assert_eq!(buffer.stride(), 8);
        assert_eq!(buffer.device_scale(), 1.0);
    }

    #[test]
    fn test_ensure_premultiplied_converts_once() {
        let mut buffer =
            PixelBuffer::new(2, 1, PixelFormat::Rgba8, vec![200, 100, 50, 255, 200, 100, 50, 0])
                .unwrap();
        buffer.ensure_premultiplied();
        assert_eq!(buffer.pixel(0, 0), [200, 100, 50, 255]);
        assert_eq!(buffer.pixel(1, 0), [0, 0, 0, 0]);

        // Second call must not scale again
        let before = buffer.clone();
        buffer.ensure_premultiplied();
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_map_rgb_skips_transparent_and_keeps_invariant() {
        let mut buffer = PixelBuffer::from_premultiplied(
            3,
            1,
            vec![0, 0, 0, 0, 64, 32, 16, 128, 10, 20, 30, 255],
        )
        .unwrap();
        buffer.map_rgb(|r, g, b| [255 - r, 255 - g, 255 - b]);
        assert_eq!(buffer.pixel(0, 0), [0, 0, 0, 0]);
        let [r, g, b, a] = buffer.pixel(1, 0);
        assert_eq!(a, 128);
        assert!(r <= a && g <= a && b <= a);
        assert_eq!(buffer.pixel(2, 0), [245, 235, 225, 255]);
    }

    #[test]
    fn test_straight_buffer_is_converted_before_mapping() {
        let mut buffer =
            PixelBuffer::new(1, 1, PixelFormat::Rgba8, vec![255, 255, 255, 51]).unwrap();
        buffer.map_rgb(|r, g, b| [r, g, b]);
        assert_eq!(buffer.format(), PixelFormat::Rgba8Premultiplied);
        assert_eq!(buffer.pixel(0, 0), [51, 51, 51, 51]);
    }

    #[test]
    fn test_premultiply_roundtrip_opaque_exact() {
        for c in 0..=255u8 {
            assert_eq!(unpremultiply(premultiply(c, 255), 255), c);
        }
    }
}
