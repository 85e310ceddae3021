//! Hue-preserving lightness and luma inversion.
//!
//! Both transforms split a pixel into a gray offset `m = min(R,G,B)`, a
//! chroma `C = max(R,G,B) - m` and a hue direction, change the brightness
//! component and rebuild RGB with the hue untouched.

use crate::buffer::PixelBuffer;

/// Luma coefficients `Y = r·R + g·G + b·B`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LumaWeights {
    /// BT.709 coefficients
    pub const PERCEPTUAL: Self = Self {
        r: 0.2126,
        g: 0.7152,
        b: 0.0722,
    };

    /// Equal weights; inverted colors keep more of their saturation
    pub const SYMMETRIC: Self = Self {
        r: 1.0 / 3.0,
        g: 1.0 / 3.0,
        b: 1.0 / 3.0,
    };

    /// Build weights, normalized so they sum to 1.
    ///
    /// Negative inputs are treated as 0. If nothing positive remains the
    /// symmetric preset is returned.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        let (r, g, b) = (r.max(0.0), g.max(0.0), b.max(0.0));
        let sum = r + g + b;
        if sum <= f32::EPSILON {
            return Self::SYMMETRIC;
        }
        Self {
            r: r / sum,
            g: g / sum,
            b: b / sum,
        }
    }
}

/// Invert HSL lightness while keeping hue and chroma.
///
/// With `m = min` and `C = max - min`, the new offset is `m' = 255 - C - m`,
/// which mirrors `(max + min) / 2` around 127.5.
pub fn invert_lightness(buffer: &mut PixelBuffer) {
    buffer.map_rgb(invert_lightness_pixel);
}

#[inline]
fn invert_lightness_pixel(r: u8, g: u8, b: u8) -> [u8; 3] {
    let m = r.min(g).min(b);
    let chroma = r.max(g).max(b) - m;
    let m_new = 255 - chroma - m;
    [r - m + m_new, g - m + m_new, b - m + m_new]
}

/// Invert luma while keeping the hue exactly.
///
/// See the crate documentation for the HCY derivation. Achromatic pixels
/// (`R = G = B`) use plain `255 - channel`.
pub fn invert_luma(buffer: &mut PixelBuffer, weights: LumaWeights) {
    buffer.map_rgb(|r, g, b| invert_luma_pixel(r, g, b, weights));
}

pub(crate) fn invert_luma_pixel(r: u8, g: u8, b: u8, w: LumaWeights) -> [u8; 3] {
    if r == g && g == b {
        return [255 - r, 255 - g, 255 - b];
    }

    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let m = rf.min(gf).min(bf);
    let chroma = rf.max(gf).max(bf) - m;

    // Pure hue direction: minimum channel 0, maximum channel 1
    let hue = [(rf - m) / chroma, (gf - m) / chroma, (bf - m) / chroma];
    // Luma of the pure hue at chroma 1; 255 * hue_luma is the luma at full chroma
    let hue_luma = w.r * hue[0] + w.g * hue[1] + w.b * hue[2];

    let luma = w.r * rf + w.g * gf + w.b * bf;
    let luma_inv = 255.0 - luma;

    let max_src = max_chroma(luma, hue_luma);
    if max_src <= f32::EPSILON {
        return [255 - r, 255 - g, 255 - b];
    }
    let chroma_inv = chroma * max_chroma(luma_inv, hue_luma) / max_src;
    let m_inv = luma_inv - chroma_inv * hue_luma;

    hue.map(|h| (m_inv + chroma_inv * h).round().clamp(0.0, 255.0) as u8)
}

/// Largest chroma a color of hue luma `hue_luma` can carry at luma `luma`.
///
/// Below the full-chroma luma the gray offset hits 0 first, above it the
/// maximum channel hits 255 first.
#[inline]
fn max_chroma(luma: f32, hue_luma: f32) -> f32 {
    if luma <= 255.0 * hue_luma {
        if hue_luma > 0.0 {
            luma / hue_luma
        } else {
            0.0
        }
    } else if hue_luma < 1.0 {
        (255.0 - luma) / (1.0 - hue_luma)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_normalize() {
        let w = LumaWeights::new(2.0, 1.0, 1.0);
        assert!((w.r - 0.5).abs() < 1e-6);
        assert!((w.r + w.g + w.b - 1.0).abs() < 1e-6);
        assert_eq!(LumaWeights::new(0.0, -1.0, 0.0), LumaWeights::SYMMETRIC);
    }

    #[test]
    fn test_invert_lightness_gray_and_primary() {
        assert_eq!(invert_lightness_pixel(0, 0, 0), [255, 255, 255]);
        assert_eq!(invert_lightness_pixel(200, 200, 200), [55, 55, 55]);
        // Fully saturated colors sit at mid lightness and stay put
        assert_eq!(invert_lightness_pixel(255, 0, 0), [255, 0, 0]);
        // Dark red becomes light red with the same chroma
        assert_eq!(invert_lightness_pixel(100, 0, 0), [255, 155, 155]);
    }

    #[test]
    fn test_invert_luma_achromatic_is_plain_invert() {
        assert_eq!(invert_luma_pixel(30, 30, 30, LumaWeights::PERCEPTUAL), [225, 225, 225]);
    }

    #[test]
    fn test_invert_luma_inverts_luma() {
        let w = LumaWeights::PERCEPTUAL;
        for &(r, g, b) in &[(200u8, 30u8, 30u8), (10, 120, 60), (90, 90, 250), (255, 255, 0)] {
            let [r2, g2, b2] = invert_luma_pixel(r, g, b, w);
            let y = w.r * r as f32 + w.g * g as f32 + w.b * b as f32;
            let y2 = w.r * r2 as f32 + w.g * g2 as f32 + w.b * b2 as f32;
            assert!((y + y2 - 255.0).abs() <= 1.0, "({r},{g},{b}) -> ({r2},{g2},{b2})");
        }
    }

    #[test]
    fn test_invert_luma_keeps_channel_order() {
        // Hue is preserved, so the ordering of the channels cannot change
        let [r, g, b] = invert_luma_pixel(220, 120, 20, LumaWeights::SYMMETRIC);
        assert!(r >= g && g >= b);
    }

    #[test]
    fn test_max_chroma_at_extremes() {
        assert_eq!(max_chroma(0.0, 0.5), 0.0);
        assert_eq!(max_chroma(255.0, 0.5), 0.0);
        assert!((max_chroma(127.5, 0.5) - 255.0).abs() < 1e-3);
    }
}
