//! Batch error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::manifest::{DirectionError, ManifestError};
use crate::orientation::OrientationError;
use crate::transform::RemapError;

/// Errors raised while baking a manifest or one of its entries.
#[derive(Debug, Error)]
pub enum BakeError {
    #[error("Manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("No entries found in {}", .0.display())]
    NoEntries(PathBuf),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Source image not found: {}", .0.display())]
    MissingSourceFile(PathBuf),

    #[error("Missing direction data for cone {cone_id}")]
    MissingDirection { cone_id: i64 },

    #[error("Invalid direction for cone {cone_id}: {source}")]
    Direction {
        cone_id: i64,
        #[source]
        source: DirectionError,
    },

    /// Yaw-only batches accept JPEG sources only.
    #[error("Unsupported source format {} (only JPG/JPEG supported)", .0.display())]
    UnsupportedSourceFormat(PathBuf),

    #[error(transparent)]
    Orientation(#[from] OrientationError),

    #[error(transparent)]
    Remap(#[from] RemapError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BakeError {
    pub(crate) fn from_direction(cone_id: i64, error: DirectionError) -> Self {
        match error {
            DirectionError::Missing => Self::MissingDirection { cone_id },
            source => Self::Direction { cone_id, source },
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error halts the whole batch rather than a single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedSourceFormat(_))
    }
}
