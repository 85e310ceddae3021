//! In-place accessibility transforms.
//!
//! Each function takes `&mut PixelBuffer`, converts it to premultiplied alpha
//! if needed and rewrites every pixel in one pass. [`AccessibilityTransform`]
//! selects one of them from configuration.

mod channels;
mod gray;
mod luma;

pub use channels::{hue_shift_negative, hue_shift_positive, invert};
pub use gray::{black_white, recolor};
pub use luma::{invert_lightness, invert_luma, LumaWeights};

use crate::buffer::PixelBuffer;
use crate::color::Rgb8;

/// One accessibility transform with its parameters.
///
/// # Example
///
/// ```
/// use pixel_recolor::{AccessibilityTransform, PixelBuffer};
///
/// let mut buffer = PixelBuffer::from_premultiplied(1, 1, vec![255, 0, 0, 255]).unwrap();
/// AccessibilityTransform::HueShiftPositive.apply(&mut buffer);
/// assert_eq!(buffer.pixel(0, 0), [0, 255, 0, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccessibilityTransform {
    /// `255 - channel`
    Invert,
    /// Gray level mapped onto a two color ramp
    Recolor {
        /// Color for black input
        foreground: Rgb8,
        /// Color for white input
        background: Rgb8,
    },
    /// Thresholded gray with optional contrast stretch
    BlackWhite {
        /// Contrast factor; values up to 2 leave the curve alone
        contrast: i32,
        /// Threshold; the pivot is `255 - threshold`
        threshold: i32,
    },
    /// HSL lightness inversion
    InvertLightness,
    /// Luma inversion with perceptual weights
    InvertLuma,
    /// Luma inversion with equal weights (keeps colors more saturated)
    InvertLumaSymmetric,
    /// `(R,G,B) -> (B,R,G)`
    HueShiftPositive,
    /// `(R,G,B) -> (G,B,R)`
    HueShiftNegative,
}

impl AccessibilityTransform {
    /// Run the transform over the whole buffer.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        match *self {
            AccessibilityTransform::Invert => invert(buffer),
            AccessibilityTransform::Recolor {
                foreground,
                background,
            } => recolor(buffer, foreground, background),
            AccessibilityTransform::BlackWhite {
                contrast,
                threshold,
            } => black_white(buffer, contrast, threshold),
            AccessibilityTransform::InvertLightness => invert_lightness(buffer),
            AccessibilityTransform::InvertLuma => invert_luma(buffer, LumaWeights::PERCEPTUAL),
            AccessibilityTransform::InvertLumaSymmetric => {
                invert_luma(buffer, LumaWeights::SYMMETRIC)
            }
            AccessibilityTransform::HueShiftPositive => hue_shift_positive(buffer),
            AccessibilityTransform::HueShiftNegative => hue_shift_negative(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(rgb: [u8; 3]) -> PixelBuffer {
        PixelBuffer::from_premultiplied(1, 1, vec![rgb[0], rgb[1], rgb[2], 255]).unwrap()
    }

    #[test]
    fn test_apply_dispatches_each_variant() {
        let cases = [
            (AccessibilityTransform::Invert, [155, 55, 225]),
            (AccessibilityTransform::HueShiftPositive, [30, 100, 200]),
            (AccessibilityTransform::HueShiftNegative, [200, 30, 100]),
        ];
        for (transform, expected) in cases {
            let mut buffer = opaque([100, 200, 30]);
            transform.apply(&mut buffer);
            let [r, g, b, a] = buffer.pixel(0, 0);
            assert_eq!([r, g, b], expected, "{transform:?}");
            assert_eq!(a, 255);
        }
    }

    #[test]
    fn test_recolor_variant_uses_its_colors() {
        let mut buffer = opaque([0, 0, 0]);
        AccessibilityTransform::Recolor {
            foreground: Rgb8::new(10, 20, 30),
            background: Rgb8::WHITE,
        }
        .apply(&mut buffer);
        assert_eq!(buffer.pixel(0, 0), [10, 20, 30, 255]);
    }

    #[test]
    fn test_luma_variants_differ_on_saturated_color() {
        let mut perceptual = opaque([0, 0, 255]);
        let mut symmetric = opaque([0, 0, 255]);
        AccessibilityTransform::InvertLuma.apply(&mut perceptual);
        AccessibilityTransform::InvertLumaSymmetric.apply(&mut symmetric);
        assert_ne!(perceptual.pixel(0, 0), symmetric.pixel(0, 0));
    }
}
