//! Pagepaint - page compositing and annotation rendering
//!
//! Paints a page raster produced elsewhere together with accessibility
//! colors, search highlights, the text selection and markup annotations.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
