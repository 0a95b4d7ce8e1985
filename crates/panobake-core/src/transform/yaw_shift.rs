//! Yaw-only correction as a horizontal circular shift.
//!
//! A rotation about the vertical axis moves every row of an equirectangular
//! image by the same number of columns, so no spherical math is needed:
//!
//! ```text
//! shift = (angle / 360 * W) mod W = int + frac
//! out[j] = (1 - frac) * src[(j - int) mod W] + frac * src[(j - int - 1) mod W]
//! ```

use super::{to_channel, RemapError};
use crate::decode::PanoramaRaster;

/// Shift every row of `raster` by `angle_degrees` of yaw.
///
/// Whole-column shifts are a pure rotation of each row. Fractional shifts
/// blend the two neighbouring source columns.
///
/// # Errors
///
/// Returns `RemapError::InvalidRasterShape` if the raster is smaller than 2x2.
pub fn shift_yaw(raster: &PanoramaRaster, angle_degrees: f64) -> Result<PanoramaRaster, RemapError> {
    raster.ensure_equirectangular()?;

    let width = raster.width as usize;
    let w = raster.width as f64;

    let mut shift = (angle_degrees / 360.0 * w).rem_euclid(w);
    if !shift.is_finite() || shift >= w {
        shift = 0.0;
    }
    let whole = shift.floor();
    let frac = shift - whole;
    let whole = whole as usize % width;

    let stride = raster.row_stride();
    let mut pixels = Vec::with_capacity(raster.pixels.len());

    for row in raster.pixels.chunks_exact(stride) {
        if frac == 0.0 {
            let mut shifted = row.to_vec();
            shifted.rotate_right(whole * 3);
            pixels.extend_from_slice(&shifted);
            continue;
        }

        for j in 0..width {
            let a = (j + width - whole) % width;
            let b = (a + width - 1) % width;
            for c in 0..3 {
                let v = (1.0 - frac) * row[a * 3 + c] as f64 + frac * row[b * 3 + c] as f64;
                pixels.push(to_channel(v));
            }
        }
    }

    Ok(PanoramaRaster::new(raster.width, raster.height, pixels))
}
