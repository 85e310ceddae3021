//! Channel-wise transforms that stay exact on premultiplied data.

use crate::buffer::PixelBuffer;

/// Invert the color channels, keeping alpha.
///
/// Computed as `a - c` on premultiplied bytes, which is `255 - c` for opaque
/// pixels and an exact involution for every alpha.
pub fn invert(buffer: &mut PixelBuffer) {
    buffer.map_premultiplied(|px| {
        let a = px[3];
        for c in &mut px[..3] {
            *c = a.saturating_sub(*c);
        }
    });
}

/// Rotate the channels forward: `(R, G, B) -> (B, R, G)`.
///
/// Three applications are the identity.
pub fn hue_shift_positive(buffer: &mut PixelBuffer) {
    buffer.map_premultiplied(|px| {
        let (r, g, b) = (px[0], px[1], px[2]);
        px[0] = b;
        px[1] = r;
        px[2] = g;
    });
}

/// Rotate the channels backward: `(R, G, B) -> (G, B, R)`.
///
/// Inverse of [`hue_shift_positive`].
pub fn hue_shift_negative(buffer: &mut PixelBuffer) {
    buffer.map_premultiplied(|px| {
        let (r, g, b) = (px[0], px[1], px[2]);
        px[0] = g;
        px[1] = b;
        px[2] = r;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;

    #[test]
    fn test_invert_opaque() {
        let mut buffer = PixelBuffer::from_premultiplied(1, 1, vec![0, 128, 255, 255]).unwrap();
        invert(&mut buffer);
        assert_eq!(buffer.pixel(0, 0), [255, 127, 0, 255]);
    }

    #[test]
    fn test_invert_translucent_stays_premultiplied() {
        let mut buffer = PixelBuffer::from_premultiplied(1, 1, vec![10, 60, 100, 100]).unwrap();
        invert(&mut buffer);
        assert_eq!(buffer.pixel(0, 0), [90, 40, 0, 100]);
    }

    #[test]
    fn test_invert_converts_straight_alpha_first() {
        let mut buffer = PixelBuffer::new(1, 1, PixelFormat::Rgba8, vec![255, 0, 0, 0]).unwrap();
        invert(&mut buffer);
        // Transparent red premultiplies to zero and stays zero
        assert_eq!(buffer.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_hue_shift_direction() {
        let mut buffer = PixelBuffer::from_premultiplied(1, 1, vec![1, 2, 3, 255]).unwrap();
        hue_shift_positive(&mut buffer);
        assert_eq!(buffer.pixel(0, 0), [3, 1, 2, 255]);
        hue_shift_negative(&mut buffer);
        assert_eq!(buffer.pixel(0, 0), [1, 2, 3, 255]);
    }
}
