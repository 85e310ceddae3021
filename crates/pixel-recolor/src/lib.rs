#![allow(clippy::manual_range_contains)]

//! pixel-recolor: accessibility color transforms for page rasters
//!
//! This library rewrites the pixels of an already rendered page so that it
//! reads better for users with low vision, light sensitivity or color vision
//! deficiencies. Every transform runs in place, in a single pass, on a
//! [`PixelBuffer`] holding premultiplied RGBA8 pixels.
//!
//! # Quick Start
//!
//! ```
//! use pixel_recolor::{AccessibilityTransform, PixelBuffer};
//!
//! let mut buffer = PixelBuffer::from_premultiplied(1, 1, vec![10, 20, 30, 255]).unwrap();
//! AccessibilityTransform::Invert.apply(&mut buffer);
//! assert_eq!(buffer.pixel(0, 0), [245, 235, 225, 255]);
//! ```
//!
//! # Buffer Invariant
//!
//! Transforms assume premultiplied alpha. A buffer created with straight
//! alpha ([`PixelFormat::Rgba8`]) is converted by
//! [`PixelBuffer::ensure_premultiplied()`] before the first transform touches
//! it, so callers can hand over whatever their decoder produced.
//!
//! Per-pixel math is defined on straight 0..=255 channel values:
//!
//! | Alpha | Handling |
//! |-------|----------|
//! | 255 | channels transformed directly |
//! | 0 | pixel left untouched |
//! | 1..=254 | unpremultiply, transform, premultiply again |
//!
//! [`transform::invert`] and the hue shifts work on the premultiplied values
//! directly (`c -> a - c` and a channel permutation). For opaque pixels this
//! is the same thing, and it keeps both exactly reversible for every alpha.
//!
//! # Transforms
//!
//! | Transform | Effect |
//! |-----------|--------|
//! | [`transform::invert`] | `255 - channel` |
//! | [`transform::recolor`] | gray level mapped onto a foreground/background ramp |
//! | [`transform::black_white`] | thresholded, contrast stretched gray |
//! | [`transform::invert_lightness`] | HSL lightness inverted, hue and chroma kept |
//! | [`transform::invert_luma`] | HCY luma inverted, hue kept exactly |
//! | [`transform::hue_shift_positive`] | `(R,G,B) -> (B,R,G)` |
//! | [`transform::hue_shift_negative`] | `(R,G,B) -> (G,B,R)` |
//!
//! ## Luma Inversion
//!
//! Plain inversion turns dark text on white paper into light text on black,
//! but it also flips every hue (red becomes cyan). Luma inversion instead
//! keeps the hue and inverts only the luma `Y = wR·R + wG·G + wB·B`.
//!
//! In the HCY model every color is `m + C·h` where `h` is the pure hue
//! vector (minimum channel 0, maximum channel 1), `C` the chroma and `m` the
//! gray offset. For a fixed hue the largest chroma a luma can carry is
//!
//! ```text
//! Cmax(Y) = Y / Yh              if Y <= 255·Yh
//!         = (255 - Y) / (1 - Yh) otherwise
//! ```
//!
//! with `Yh = wR·hR + wG·hG + wB·hB` the luma of the pure hue at chroma 1.
//! The inverted pixel keeps `h`, takes `Y' = 255 - Y` and scales its chroma
//! by `Cmax(Y') / Cmax(Y)`, so applying the transform twice returns the
//! original color up to rounding.

pub mod buffer;
pub mod color;
pub mod error;
pub mod transform;


pub use buffer::{PixelBuffer, PixelFormat};
pub use color::{gray, Rgb8};
pub use error::{BufferError, ParseColorError};
pub use transform::{AccessibilityTransform, LumaWeights};
