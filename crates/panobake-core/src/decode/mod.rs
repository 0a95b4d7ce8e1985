//! Panorama decoding.
//!
//! This module provides functionality for:
//! - The in-memory RGB raster every transform operates on
//! - Decoding JPEG and PNG sources (RGBA and grayscale collapse to RGB)
//! - Classifying source files by format
//!
//! EXIF orientation is deliberately not applied: panoramas are stored in
//! their native equirectangular layout.

mod source;
mod types;

pub use source::{decode_raster, is_jpeg_source, load_raster, source_format};
pub use types::{DecodeError, PanoramaRaster};
