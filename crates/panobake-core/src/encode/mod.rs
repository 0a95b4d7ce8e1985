//! Panorama encoding.
//!
//! Baked panoramas are written as JPEG. Quality is always passed in by the
//! caller; there is no process-wide default.
//!
//! # Examples
//!
//! ```ignore
//! use panobake_core::encode::encode_jpeg;
//!
//! let jpeg_bytes = encode_jpeg(&raster, 85)?;
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError};
