//! Euler angle extraction and composition in the engine's YXZ order.

use nalgebra::{Matrix3, Rotation3, Vector3};

use super::basis::{DirectionBasis, OrientationError};

/// Below this norm the cross products of the basis are treated as zero.
const BASIS_EPSILON: f64 = 1e-12;

/// `|m23|` at or above this value is handled as gimbal lock.
const GIMBAL_LOCK_THRESHOLD: f64 = 0.999_999_9;

/// Angles closer than this to zero (degrees) count as no rotation.
const IDENTITY_EPSILON_DEGREES: f64 = 1e-9;

/// Yaw/pitch/roll in degrees, intrinsic YXZ order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    /// Rotation about Y (left/right), degrees.
    pub yaw: f64,
    /// Rotation about the rotated X (up/down), degrees.
    pub pitch: f64,
    /// Rotation about the rotated Z (tilt), degrees, engine sign convention.
    pub roll: f64,
}

impl EulerAngles {
    /// Angles in degrees.
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Angles for a pure horizontal correction.
    pub fn yaw_only(yaw: f64) -> Self {
        Self::new(yaw, 0.0, 0.0)
    }

    /// Extract engine Euler angles from an engine-frame basis.
    ///
    /// Builds the `[right, correctedUp, -forward]` camera matrix and
    /// decomposes it in YXZ order. The decomposed roll is negated to match
    /// the engine's roll sign.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::DegenerateBasis` if forward and up are
    /// parallel.
    pub fn from_basis(basis: &DirectionBasis) -> Result<Self, OrientationError> {
        let matrix = basis_matrix(basis)?;
        let (yaw, pitch, roll) = decompose_yxz(&matrix);
        Ok(Self {
            yaw: yaw.to_degrees(),
            pitch: pitch.to_degrees(),
            roll: -roll.to_degrees(),
        })
    }

    /// True if all three angles are effectively zero.
    pub fn is_identity(&self) -> bool {
        self.yaw.abs() < IDENTITY_EPSILON_DEGREES
            && self.pitch.abs() < IDENTITY_EPSILON_DEGREES
            && self.roll.abs() < IDENTITY_EPSILON_DEGREES
    }


    /// Forward rotation applied to the panorama.
    ///
    /// Roll is negated again here: the stored roll already carries the
    /// engine's flipped sign, and the rotation is built in matrix convention.
    pub fn sampling_rotation(&self) -> Rotation3<f64> {
        compose_yxz(
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            (-self.roll).to_radians(),
        )
    }
}

/// Compose an intrinsic YXZ rotation `Ry(yaw) * Rx(pitch) * Rz(roll)` (radians).
pub fn compose_yxz(yaw: f64, pitch: f64, roll: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), yaw)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), pitch)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), roll)
}

/// Build the camera matrix with columns `[right, correctedUp, -forward]`.
///
/// `right = normalize(up x forward)` and `correctedUp = normalize(forward x right)`.
/// The result is orthonormal but left-handed for the engine's -Z camera, and
/// is decomposed entry by entry without re-projection onto a rotation.
pub fn basis_matrix(basis: &DirectionBasis) -> Result<Matrix3<f64>, OrientationError> {
    let forward = basis.forward();
    let right = basis
        .up()
        .cross(&forward)
        .try_normalize(BASIS_EPSILON)
        .ok_or(OrientationError::DegenerateBasis)?;
    let corrected_up = forward
        .cross(&right)
        .try_normalize(BASIS_EPSILON)
        .ok_or(OrientationError::DegenerateBasis)?;

    Ok(Matrix3::from_columns(&[right, corrected_up, -forward]))
}

/// Decompose a matrix into YXZ angles `(yaw, pitch, roll)` in radians.
///
/// Reads matrix entries the way the engine does:
/// ```text
/// pitch = asin(-m23)
/// yaw   = atan2(m13, m33)      roll = atan2(m21, m22)
/// ```
/// falling back to `yaw = atan2(-m31, m11)`, `roll = 0` at gimbal lock.
pub fn decompose_yxz(m: &Matrix3<f64>) -> (f64, f64, f64) {
    let m11 = m[(0, 0)];
    let m13 = m[(0, 2)];
    let m21 = m[(1, 0)];
    let m22 = m[(1, 1)];
    let m23 = m[(1, 2)];
    let m31 = m[(2, 0)];
    let m33 = m[(2, 2)];

    let pitch = (-m23.clamp(-1.0, 1.0)).asin();

    if m23.abs() < GIMBAL_LOCK_THRESHOLD {
        (m13.atan2(m33), pitch, m21.atan2(m22))
    } else {
        ((-m31).atan2(m11), pitch, 0.0)
    }
}
