//! Forward/up direction pairs and capture-to-engine frame conversion.

use nalgebra::{Unit, Vector3};
use thiserror::Error;

/// Errors raised while building an orientation from direction vectors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OrientationError {
    /// A direction vector has zero or non-finite magnitude.
    #[error("Degenerate direction vector: magnitude is zero or not finite")]
    DegenerateVector,

    /// Forward and up are parallel, so no right axis exists.
    #[error("Degenerate basis: forward and up vectors are parallel")]
    DegenerateBasis,
}

/// Convert a Z-up capture vector into the Y-up engine frame.
#[inline]
pub fn capture_to_engine(v: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, v.z, -v.y)
}

fn normalize(v: Vector3<f64>) -> Result<Unit<Vector3<f64>>, OrientationError> {
    let norm = v.norm();
    if !norm.is_finite() || norm == 0.0 {
        return Err(OrientationError::DegenerateVector);
    }
    Ok(Unit::new_unchecked(v / norm))
}

/// A normalized forward/up pair expressed in the engine (Y-up) frame.
///
/// Forward and up are normalized independently and need not be orthogonal.
/// [`crate::orientation::basis_matrix`] derives orthogonal right and
/// corrected-up axes from them; it does not project onto a rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionBasis {
    forward: Unit<Vector3<f64>>,
    up: Unit<Vector3<f64>>,
}

impl DirectionBasis {
    /// Build a basis from capture-frame (Z-up) vectors.
    ///
    /// Both vectors go through the `(x, y, z) -> (x, z, -y)` permutation and
    /// are then normalized.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::DegenerateVector` if either vector has zero
    /// or non-finite magnitude.
    pub fn from_capture_frame(
        forward: Vector3<f64>,
        up: Vector3<f64>,
    ) -> Result<Self, OrientationError> {
        Self::from_engine_frame(capture_to_engine(forward), capture_to_engine(up))
    }

    /// Build a basis from vectors already in the engine frame.
    pub fn from_engine_frame(
        forward: Vector3<f64>,
        up: Vector3<f64>,
    ) -> Result<Self, OrientationError> {
        Ok(Self {
            forward: normalize(forward)?,
            up: normalize(up)?,
        })
    }

    /// The canonical orientation: forward = +Z, up = +Y in the engine frame.
    pub fn canonical() -> Self {
        Self {
            forward: Vector3::z_axis(),
            up: Vector3::y_axis(),
        }
    }

    /// Unit forward vector (engine frame).
    pub fn forward(&self) -> Vector3<f64> {
        self.forward.into_inner()
    }

    /// Unit up vector (engine frame).
    pub fn up(&self) -> Vector3<f64> {
        self.up.into_inner()
    }
}
