//! Batch configuration.

use std::path::{Path, PathBuf};

/// JPEG quality used by the full 3-axis batch.
pub const DEFAULT_CONE_QUALITY: u8 = 85;
/// JPEG quality used by the yaw-only batch.
pub const DEFAULT_NAVIGATION_QUALITY: u8 = 80;
/// Directory created next to each source image for baked output.
pub const PROCESSED_DIR_NAME: &str = "processed";
/// Appended to the navigation manifest's file stem for the output manifest.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-processed";

/// Immutable settings threaded through a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakeConfig {
    /// JPEG quality (1-100) for baked images.
    pub quality: u8,
    /// Plan only: no images, manifests or backups are written.
    pub dry_run: bool,
    /// Process at most this many entries.
    pub limit: Option<usize>,
    /// Directory manifest image paths are relative to.
    pub base_dir: PathBuf,
    pub processed_dir_name: String,
    pub output_suffix: String,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_CONE_QUALITY,
            dry_run: false,
            limit: None,
            base_dir: PathBuf::from("."),
            processed_dir_name: PROCESSED_DIR_NAME.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl BakeConfig {
    /// Defaults for the yaw-only navigation batch.
    pub fn navigation() -> Self {
        Self {
            quality: DEFAULT_NAVIGATION_QUALITY,
            ..Self::default()
        }
    }

    /// Set the JPEG quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Enable or disable dry-run.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// A limit of zero means no limit.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.filter(|&n| n > 0);
        self
    }

    /// Set the directory image paths resolve against.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Set the navigation output manifest suffix.
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Location on disk of a manifest image path.
    pub fn resolve(&self, image_path: &str) -> PathBuf {
        self.base_dir.join(Path::new(image_path))
    }

    /// Number of entries to process out of `available`.
    pub(crate) fn take_count(&self, available: usize) -> usize {
        self.limit.map_or(available, |n| n.min(available))
    }
}
