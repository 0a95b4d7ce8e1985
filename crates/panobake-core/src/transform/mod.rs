//! Spherical remapping of equirectangular panoramas.
//!
//! Two resampling paths share one sign convention:
//! 1. Full 3-axis rotation (yaw, pitch, roll) by inverse mapping through the
//!    sphere with seam-aware bilinear sampling
//! 2. Yaw-only horizontal circular shift, used when only a single
//!    horizontal correction is known
//!
//! # Coordinate System
//!
//! - Column `j` maps to longitude `j / W * 2pi - pi`
//! - Row `i` maps to latitude `(0.5 - i / H) * pi`
//! - Longitude `0` looks down +Z, `pi/2` looks down +X
//! - A positive yaw moves content towards higher column indices
//!
//! Both paths produce a raster with the same dimensions as the source and
//! never block or perform I/O.

mod spherical;
mod yaw_shift;

use thiserror::Error;

use crate::decode::PanoramaRaster;

pub use spherical::{rotate_equirectangular, EquirectMap};
pub use yaw_shift::shift_yaw;

/// Errors raised by the resampling kernels.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RemapError {
    /// The raster is too small to define longitude/latitude sampling.
    #[error("Invalid raster shape {width}x{height}: equirectangular rasters must be at least 2x2")]
    InvalidRasterShape { width: u32, height: u32 },
}

fn check_shape(width: u32, height: u32) -> Result<(), RemapError> {
    if width < 2 || height < 2 {
        return Err(RemapError::InvalidRasterShape { width, height });
    }
    Ok(())
}

/// Round and saturate a blended channel value.
#[inline]
fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl PanoramaRaster {
    fn ensure_equirectangular(&self) -> Result<(), RemapError> {
        check_shape(self.width, self.height)
    }
}
