//! Full 3-axis bake of a cone export.

use std::path::Path;

use chrono::Local;
use tracing::{debug, info, warn};

use super::output::{backup_manifest, processed_target, write_atomic, write_json_atomic};
use super::{BakeConfig, BakeError, BatchReport};
use crate::decode::load_raster;
use crate::encode::encode_jpeg;
use crate::manifest::{ConeEntry, ConeManifest};
use crate::orientation::EulerAngles;
use crate::transform::rotate_equirectangular;

/// Bake every cone of the manifest at `input` and write the result to `output`.
///
/// Failed cones are logged, recorded in the report and left out of the
/// output manifest. Nothing is written in dry-run mode or when no cone
/// succeeded; otherwise `input` is backed up first.
///
/// # Errors
///
/// Returns an error if the manifest is missing, malformed or has no cones,
/// or if the backup or output manifest cannot be written.
pub fn bake_cone_manifest(
    input: &Path,
    output: &Path,
    config: &BakeConfig,
) -> Result<BatchReport, BakeError> {
    if !input.is_file() {
        return Err(BakeError::ManifestNotFound(input.to_path_buf()));
    }

    let manifest = ConeManifest::load(input)?;
    if manifest.cones.is_empty() {
        return Err(BakeError::NoEntries(input.to_path_buf()));
    }

    let count = config.take_count(manifest.cones.len());
    if count < manifest.cones.len() {
        info!(limit = count, total = manifest.cones.len(), "Processing only the first cones");
    }
    info!(manifest = %input.display(), cones = count, dry_run = config.dry_run, "Baking cone rotations");

    let mut report = BatchReport::new(config.dry_run);
    let mut baked = Vec::with_capacity(count);

    for cone in &manifest.cones[..count] {
        match bake_cone(cone, config) {
            Ok(entry) => {
                report.succeeded += 1;
                baked.push(entry);
            }
            Err(err) => {
                warn!(cone_id = cone.cone_id, image = %cone.image_path, error = %err, "Cone skipped");
                report.record_failure(format!("cone {}", cone.cone_id), &err);
            }
        }
    }

    if config.dry_run {
        debug!(output = %output.display(), cones = baked.len(), "Dry run: would write manifest");
    } else if baked.is_empty() {
        warn!("No cones baked; output manifest not written");
    } else {
        let now = Local::now();
        let backup = backup_manifest(input, &now)?;
        info!(backup = %backup.display(), "Backed up input manifest");

        write_json_atomic(output, &manifest.baked(baked, input, &now))?;
        info!(output = %output.display(), "Wrote processed manifest");

        report.backup = Some(backup);
        report.output_manifest = Some(output.to_path_buf());
    }

    info!(succeeded = report.succeeded, failed = report.failed(), "Cone batch complete");
    Ok(report)
}

/// Bake a single cone and return its output manifest entry.
///
/// In dry-run mode the orientation is still computed and validated, but no
/// image is read or written.
pub fn bake_cone(cone: &ConeEntry, config: &BakeConfig) -> Result<ConeEntry, BakeError> {
    let source = config.resolve(&cone.image_path);
    if !source.is_file() {
        return Err(BakeError::MissingSourceFile(source));
    }

    let basis = cone
        .direction_basis()
        .map_err(|e| BakeError::from_direction(cone.cone_id, e))?;
    let angles = EulerAngles::from_basis(&basis)?;
    info!(
        cone_id = cone.cone_id,
        yaw = format_args!("{:.2}", angles.yaw),
        pitch = format_args!("{:.2}", angles.pitch),
        roll = format_args!("{:.2}", angles.roll),
        "Computed cone orientation"
    );

    let target = processed_target(&config.base_dir, &cone.image_path, &config.processed_dir_name)
        .ok_or_else(|| BakeError::MissingSourceFile(source.clone()))?;

    if config.dry_run {
        debug!(source = %source.display(), target = %target.file.display(), "Dry run: would bake cone");
        return Ok(cone.baked(target.reference));
    }

    let raster = load_raster(&source)?;
    let rotated = rotate_equirectangular(&raster, &angles)?;
    let bytes = encode_jpeg(&rotated, config.quality)?;
    write_atomic(&target.file, &bytes).map_err(|e| BakeError::io(&target.file, e))?;

    info!(
        cone_id = cone.cone_id,
        output = %target.file.display(),
        width = rotated.width,
        height = rotated.height,
        "Baked cone"
    );
    Ok(cone.baked(target.reference))
}
