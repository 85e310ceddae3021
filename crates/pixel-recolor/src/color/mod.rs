//! Color type and gray-level helpers
//!
//! [`Rgb8`] is the 8-bit color used for configuration values (paper color,
//! recolor ramp ends, highlight colors). [`gray()`] is the perceptual gray
//! level every gray-based transform shares.
//!
//! # Example
//!
//! ```
//! use pixel_recolor::{gray, Rgb8};
//!
//! let paper: Rgb8 = "#fdf6e3".parse().unwrap();
//! assert_eq!(paper.to_string(), "#fdf6e3");
//! assert_eq!(gray(255, 255, 255), 255);
//! ```

mod rgb8;

pub use rgb8::Rgb8;

/// Perceptual gray level of an RGB triple.
///
/// Uses the integer weights `(11, 16, 5) / 32`, which keeps pure white at 255
/// and pure black at 0.
#[inline]
pub fn gray(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 11 + g as u32 * 16 + b as u32 * 5) / 32) as u8
}
