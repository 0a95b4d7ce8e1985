//! Batch baking of panorama orientations.
//!
//! Two batches share one pipeline (load, resample, encode, atomic write) but
//! keep different failure policies:
//!
//! - [`bake_cone_manifest`]: full 3-axis rotation per cone. Any entry failure
//!   is recorded and the batch continues; failed cones are left out of the
//!   output manifest.
//! - [`bake_navigation_manifest`]: yaw-only shift per unique image. Missing
//!   files are recorded and skipped, but a non-JPEG source aborts the whole
//!   batch before any manifest is written.
//!
//! Source images are never overwritten; results land in a `processed/`
//! directory next to each source. The input manifest is backed up before the
//! output manifest is written.

mod cone;
mod config;
mod error;
mod navigation;
mod output;

use std::path::PathBuf;

pub use cone::{bake_cone, bake_cone_manifest};
pub use config::{
    BakeConfig, DEFAULT_CONE_QUALITY, DEFAULT_NAVIGATION_QUALITY, DEFAULT_OUTPUT_SUFFIX,
    PROCESSED_DIR_NAME,
};
pub use error::BakeError;
pub use navigation::{bake_navigation_manifest, bake_sphere};
pub use output::{backup_path_for, processed_target, write_atomic, ProcessedTarget};

/// An entry that could not be baked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// Human-readable entry label, e.g. `cone 12` or an image path.
    pub entry: String,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failures: Vec<EntryFailure>,
    /// Written manifest; `None` in dry-run or when nothing was written.
    pub output_manifest: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub dry_run: bool,
}

impl BatchReport {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Number of entries that could not be baked.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when no entry failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, entry: impl Into<String>, error: &BakeError) {
        self.failures.push(EntryFailure {
            entry: entry.into(),
            reason: error.to_string(),
        });
    }
}
