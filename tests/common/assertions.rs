//! Pixel assertion helpers for tests.

use pagepaint::models::IntRect;
use pretty_assertions::assert_eq;
use tiny_skia::Pixmap;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Straight RGBA of a pixel
pub fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
    let c = pixmap
        .pixel(x, y)
        .unwrap_or_else(|| panic!("Pixel ({x}, {y}) outside {}x{}", pixmap.width(), pixmap.height()))
        .demultiply();
    [c.red(), c.green(), c.blue(), c.alpha()]
}

/// Assert a pixel matches within `tolerance` per channel
pub fn assert_pixel_near(pixmap: &Pixmap, x: u32, y: u32, expected: [u8; 4], tolerance: u8) {
    let actual = pixel(pixmap, x, y);
    let close = actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance);
    assert!(
        close,
        "Pixel ({x}, {y}) is {actual:?}, expected {expected:?} within {tolerance}"
    );
}

/// Assert a pixel is exactly `expected`
pub fn assert_pixel(pixmap: &Pixmap, x: u32, y: u32, expected: [u8; 4]) {
    assert_eq!(pixel(pixmap, x, y), expected, "Pixel ({x}, {y})");
}

/// Assert every pixel outside `limits` is still fully transparent
pub fn assert_untouched_outside(pixmap: &Pixmap, limits: IntRect) {
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            if limits.contains_point(x as i32, y as i32) {
                continue;
            }
            assert_eq!(
                pixel(pixmap, x, y)[3],
                0,
                "Pixel ({x}, {y}) outside {limits:?} was painted"
            );
        }
    }
}

/// Assert every pixel is gray (equal channels)
pub fn assert_all_gray(pixmap: &Pixmap) {
    for (i, px) in pixmap.pixels().iter().enumerate() {
        let c = px.demultiply();
        assert!(
            c.red() == c.green() && c.green() == c.blue(),
            "Pixel {i} is not gray: {:?}",
            [c.red(), c.green(), c.blue()]
        );
    }
}
