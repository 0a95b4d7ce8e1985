//! Camera orientation: direction bases and engine Euler angles.
//!
//! Capture data describes each panorama's camera with a forward/up vector
//! pair in a Z-up frame. The viewer engine is Y-up and its camera looks down
//! local -Z, so orientations are converted into the engine frame before any
//! angles are extracted.
//!
//! # Coordinate Systems
//!
//! - Capture frame: X east, Y north, Z up
//! - Engine frame: X right, Y up, Z towards the viewer
//! - Capture `(x, y, z)` maps to engine `(x, z, -y)`
//!
//! # Euler Convention
//!
//! Angles are intrinsic yaw (about Y), then pitch (about the new X), then
//! roll (about the newest Z), in degrees. Extracted roll carries the engine's
//! sign convention, see [`EulerAngles::from_basis`].

mod basis;
mod euler;

pub use basis::{capture_to_engine, DirectionBasis, OrientationError};
pub use euler::{basis_matrix, compose_yxz, decompose_yxz, EulerAngles};
