//! Full 3-axis equirectangular rotation.
//!
//! # Algorithm
//!
//! Inverse mapping: every output pixel is turned into a direction on the
//! unit sphere, rotated by the inverse panorama rotation, and converted back
//! to a fractional source position:
//!
//! ```text
//! d        = (cos(lat) sin(lon), sin(lat), cos(lat) cos(lon))
//! d'       = R^T d
//! lon_src  = atan2(d'.x, d'.z)        lat_src = asin(d'.y)
//! j_src    = (lon_src + pi) / 2pi * W  (wrapped, longitude is cyclic)
//! i_src    = (0.5 - lat_src / pi) * H  (clamped, poles are not cyclic)
//! ```
//!
//! The source is then sampled bilinearly, wrapping columns across the seam.

use std::f64::consts::{PI, TAU};

use nalgebra::{Matrix3, Vector3};
use rayon::prelude::*;

use super::{check_shape, to_channel, RemapError};
use crate::decode::PanoramaRaster;
use crate::orientation::EulerAngles;

/// Output-to-source coordinate map for one rotation and raster size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquirectMap {
    inverse: Matrix3<f64>,
    width: u32,
    height: u32,
}

impl EquirectMap {
    /// Prepare the inverse map for `angles` on a `width` x `height` raster.
    ///
    /// # Errors
    ///
    /// Returns `RemapError::InvalidRasterShape` if either dimension is below 2.
    pub fn new(angles: &EulerAngles, width: u32, height: u32) -> Result<Self, RemapError> {
        check_shape(width, height)?;
        Ok(Self {
            inverse: angles.sampling_rotation().inverse().into_inner(),
            width,
            height,
        })
    }

    /// Fractional source position `(i_src, j_src)` sampled by output pixel `(row, col)`.
    ///
    /// `i_src` is clamped to `[0, H-1]` and `j_src` wrapped into `[0, W)`.
    pub fn source_position(&self, row: u32, col: u32) -> (f64, f64) {
        let (w, h) = (self.width as f64, self.height as f64);

        let lon = (col as f64 / w) * TAU - PI;
        let lat = (0.5 - row as f64 / h) * PI;
        let direction = Vector3::new(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos());

        let src = self.inverse * direction;
        let lon_src = src.x.atan2(src.z);
        let lat_src = src.y.clamp(-1.0, 1.0).asin();

        let mut j_src = ((lon_src + PI) / TAU * w).rem_euclid(w);
        // rem_euclid may round up to exactly w
        if j_src >= w {
            j_src = 0.0;
        }
        let i_src = ((0.5 - lat_src / PI) * h).clamp(0.0, h - 1.0);

        (i_src, j_src)
    }
}

/// Rotate an equirectangular panorama by `angles`.
///
/// Rows are resampled in parallel. Zero angles return a copy of the source.
///
/// # Errors
///
/// Returns `RemapError::InvalidRasterShape` if the raster is smaller than 2x2.
pub fn rotate_equirectangular(
    raster: &PanoramaRaster,
    angles: &EulerAngles,
) -> Result<PanoramaRaster, RemapError> {
    raster.ensure_equirectangular()?;
    let map = EquirectMap::new(angles, raster.width, raster.height)?;

    if angles.is_identity() {
        return Ok(raster.clone());
    }

    let stride = raster.row_stride();
    let mut pixels = vec![0u8; stride * raster.height as usize];

    pixels
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, px) in out.chunks_exact_mut(3).enumerate() {
                let (i_src, j_src) = map.source_position(row as u32, col as u32);
                px.copy_from_slice(&sample_bilinear_wrapped(raster, i_src, j_src));
            }
        });

    Ok(PanoramaRaster::new(raster.width, raster.height, pixels))
}

#[inline]
fn get_pixel_f64(raster: &PanoramaRaster, row: usize, col: usize) -> [f64; 3] {
    let idx = (row * raster.width as usize + col) * 3;
    [
        raster.pixels[idx] as f64,
        raster.pixels[idx + 1] as f64,
        raster.pixels[idx + 2] as f64,
    ]
}

/// Bilinear sample with cyclic columns and clamped rows.
///
/// `i_src` must lie in `[0, H-1]` and `j_src` in `[0, W)`.
fn sample_bilinear_wrapped(raster: &PanoramaRaster, i_src: f64, j_src: f64) -> [u8; 3] {
    let (w, h) = (raster.width as usize, raster.height as usize);

    let i_floor = i_src.floor();
    let j_floor = j_src.floor();
    let fi = i_src - i_floor;
    let fj = j_src - j_floor;

    let i0 = (i_floor as usize).min(h - 1);
    let i1 = (i0 + 1).min(h - 1);
    let j0 = (j_floor as usize) % w;
    let j1 = (j0 + 1) % w;

    let p00 = get_pixel_f64(raster, i0, j0);
    let p01 = get_pixel_f64(raster, i0, j1);
    let p10 = get_pixel_f64(raster, i1, j0);
    let p11 = get_pixel_f64(raster, i1, j1);

    let mut result = [0u8; 3];
    for c in 0..3 {
        let v = p00[c] * (1.0 - fi) * (1.0 - fj)
            + p01[c] * (1.0 - fi) * fj
            + p10[c] * fi * (1.0 - fj)
            + p11[c] * fi * fj;
        result[c] = to_channel(v);
    }
    result
}


// ============================================================================
// Property-Based Tests
// ============================================================================
