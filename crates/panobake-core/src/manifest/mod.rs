//! Manifest documents read and written by the bake batches.
//!
//! - [`ConeManifest`]: typed cone export carrying full forward/up orientation
//! - [`NavigationManifest`]: free-form navigation document whose image entries
//!   are found by walking the JSON tree for `imagePath` keys
//!
//! Keys the batches do not own are passed through untouched, in order.

mod cone;
mod navigation;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use cone::{ConeDirection, ConeEntry, ConeManifest, DirectionError, JsonVector};
pub use navigation::{ImageRef, NavigationManifest};

/// Errors reading or writing manifest documents.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let bytes = std::fs::read(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize with two-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ManifestError> {
    Ok(serde_json::to_vec_pretty(value)?)
}
