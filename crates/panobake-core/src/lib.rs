//! Panobake Core - panorama orientation baking
//!
//! This crate bakes camera orientation into equirectangular panoramas so
//! every baked image faces a single canonical direction. It provides the
//! orientation math, the spherical resampler, manifest handling and the
//! batch orchestrator used by the `panobake` binary.

pub mod batch;
pub mod decode;
pub mod encode;
pub mod manifest;
pub mod orientation;
pub mod transform;

pub use batch::{
    bake_cone_manifest, bake_navigation_manifest, BakeConfig, BakeError, BatchReport, EntryFailure,
};
pub use decode::{load_raster, DecodeError, PanoramaRaster};
pub use encode::{encode_jpeg, EncodeError};
pub use orientation::{DirectionBasis, EulerAngles, OrientationError};
pub use transform::{rotate_equirectangular, shift_yaw, EquirectMap, RemapError};
