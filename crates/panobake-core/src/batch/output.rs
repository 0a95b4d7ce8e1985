//! File output: processed-image targets, atomic writes, manifest backups.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tempfile::NamedTempFile;

use super::BakeError;
use crate::manifest::to_pretty_json;

/// Where a baked image goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedTarget {
    /// Path on disk.
    pub file: PathBuf,
    /// Path as written back into the manifest, `/`-separated.
    pub reference: String,
}

/// Target for `image_path` inside a `dir_name` directory beside the source.
///
/// Returns `None` if `image_path` has no file name.
pub fn processed_target(base_dir: &Path, image_path: &str, dir_name: &str) -> Option<ProcessedTarget> {
    let relative = Path::new(image_path);
    let file_name = relative.file_name()?;
    let reference_path = relative
        .parent()
        .unwrap_or(Path::new(""))
        .join(dir_name)
        .join(file_name);

    Some(ProcessedTarget {
        file: base_dir.join(&reference_path),
        reference: to_reference(&reference_path),
    })
}

fn to_reference(path: &Path) -> String {
    let mut parts = Vec::new();
    let mut absolute = false;
    for component in path.components() {
        match component {
            Component::RootDir => absolute = true,
            Component::CurDir => {}
            other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Write `bytes` to `path` via a temp file in the same directory.
///
/// Creates missing parent directories. Readers never observe a partial file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), BakeError> {
    let bytes = to_pretty_json(value)?;
    write_atomic(path, &bytes).map_err(|e| BakeError::io(path, e))
}

/// `<stem>.bak.<YYYYmmdd-HHMMSS>.<ext>` beside `manifest`.
pub fn backup_path_for(manifest: &Path, timestamp: &DateTime<Local>) -> PathBuf {
    let stamp = timestamp.format("%Y%m%d-%H%M%S");
    let stem = manifest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match manifest.extension() {
        Some(ext) => format!("{stem}.bak.{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}.bak.{stamp}"),
    };
    manifest.with_file_name(name)
}

/// Copy `manifest` to its timestamped backup path.
pub(crate) fn backup_manifest(manifest: &Path, timestamp: &DateTime<Local>) -> Result<PathBuf, BakeError> {
    let backup = backup_path_for(manifest, timestamp);
    std::fs::copy(manifest, &backup).map_err(|e| BakeError::io(&backup, e))?;
    Ok(backup)
}
