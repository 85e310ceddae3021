//! Gray-level based transforms: two color ramp and black/white.

use crate::buffer::PixelBuffer;
use crate::color::{gray, Rgb8};

/// Map every pixel's gray level onto the ramp `foreground -> background`.
///
/// Black input becomes `foreground`, white input becomes `background`:
/// `out = fg + L / 255 * (bg - fg)` per channel.
pub fn recolor(buffer: &mut PixelBuffer, foreground: Rgb8, background: Rgb8) {
    let fg = foreground.to_bytes().map(|c| c as f32);
    let span = [
        background.r as f32 - fg[0],
        background.g as f32 - fg[1],
        background.b as f32 - fg[2],
    ];
    buffer.map_rgb(|r, g, b| {
        let lightness = gray(r, g, b) as f32 / 255.0;
        [0, 1, 2].map(|i| (fg[i] + lightness * span[i]).round().clamp(0.0, 255.0) as u8)
    });
}

/// Reduce the image to gray through a threshold curve.
///
/// The pivot is `255 - threshold`. Gray levels above
/// the pivot are spread over `128..=255`, levels below it over `0..=128`.
/// A `contrast` above 2 then stretches the result around the pivot. The
/// value is written to all three channels; alpha is kept.
pub fn black_white(buffer: &mut PixelBuffer, contrast: i32, threshold: i32) {
    let pivot = 255 - threshold;
    buffer.map_rgb(|r, g, b| {
        let v = threshold_gray(gray(r, g, b) as i32, pivot, contrast);
        [v, v, v]
    });
}

#[inline]
fn threshold_gray(gray: i32, pivot: i32, contrast: i32) -> u8 {
    let mut v = gray;
    if v > pivot {
        v = 128 + (127 * (v - pivot)) / (255 - pivot);
    } else if v < pivot {
        v = (128 * v) / pivot;
    }
    if contrast > 2 {
        v = contrast * (v - pivot) / 2 + pivot;
    }
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pixels: &[[u8; 3]]) -> PixelBuffer {
        let data = pixels.iter().flat_map(|p| [p[0], p[1], p[2], 255]).collect();
        PixelBuffer::from_premultiplied(pixels.len() as u32, 1, data).unwrap()
    }

    #[test]
    fn test_recolor_endpoints() {
        let fg = Rgb8::new(40, 30, 20);
        let bg = Rgb8::new(250, 240, 200);
        let mut buffer = row(&[[0, 0, 0], [255, 255, 255]]);
        recolor(&mut buffer, fg, bg);
        assert_eq!(buffer.pixel(0, 0), [40, 30, 20, 255]);
        assert_eq!(buffer.pixel(1, 0), [250, 240, 200, 255]);
    }

    #[test]
    fn test_recolor_midpoint_interpolates() {
        let mut buffer = row(&[[128, 128, 128]]);
        recolor(&mut buffer, Rgb8::BLACK, Rgb8::new(0, 200, 0));
        let [r, g, b, _] = buffer.pixel(0, 0);
        assert_eq!((r, b), (0, 0));
        assert!((99..=101).contains(&g), "got {g}");
    }

    #[test]
    fn test_threshold_curve_pivot_and_ends() {
        // threshold 127 -> pivot 128
        assert_eq!(threshold_gray(0, 128, 2), 0);
        assert_eq!(threshold_gray(255, 128, 2), 255);
        assert_eq!(threshold_gray(128, 128, 2), 128);
        // Below pivot maps into 0..128, above into 128..255
        assert!(threshold_gray(100, 128, 2) < 128);
        assert!(threshold_gray(200, 128, 2) > 128);
    }

    #[test]
    fn test_contrast_stretch_clamps() {
        assert_eq!(threshold_gray(250, 128, 8), 255);
        assert_eq!(threshold_gray(10, 128, 8), 0);
    }

    #[test]
    fn test_black_white_extreme_threshold_uses_exact_pivot() {
        // Threshold 255 puts the pivot at 0: any ink above it lands in the upper half
        let mut buffer = row(&[[1, 1, 1], [0, 0, 0]]);
        black_white(&mut buffer, 2, 255);
        assert_eq!(buffer.pixel(0, 0), [128, 128, 128, 255]);
        assert_eq!(buffer.pixel(1, 0), [0, 0, 0, 255]);

        // Threshold 0 puts the pivot at 255: everything below it is compressed
        let mut buffer = row(&[[254, 254, 254], [255, 255, 255]]);
        black_white(&mut buffer, 2, 0);
        assert_eq!(buffer.pixel(0, 0), [127, 127, 127, 255]);
        assert_eq!(buffer.pixel(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_black_white_extreme_threshold_does_not_divide_by_zero() {
        let mut buffer = row(&[[0, 0, 0], [255, 255, 255], [90, 10, 200]]);
        black_white(&mut buffer, 2, 255);
        black_white(&mut buffer, 2, 0);
        for x in 0..3 {
            let [r, g, b, a] = buffer.pixel(x, 0);
            assert!(r == g && g == b);
            assert_eq!(a, 255);
        }
    }
}
