//! Yaw-only bake of a navigation manifest.

use std::collections::HashMap;
use std::path::Path;

use chrono::Local;
use tracing::{debug, error, info, warn};

use super::output::{backup_manifest, processed_target, write_atomic, write_json_atomic};
use super::{BakeConfig, BakeError, BatchReport};
use crate::decode::{is_jpeg_source, load_raster};
use crate::encode::encode_jpeg;
use crate::manifest::NavigationManifest;
use crate::transform::shift_yaw;

/// Bake the rotation correction of every unique image in the manifest.
///
/// Each image is shifted by the negated `rotationCorrection`. The output
/// manifest is written beside the input as `<stem><suffix>.<ext>` after the
/// input has been backed up; the input itself is never modified.
///
/// # Errors
///
/// Returns `BakeError::UnsupportedSourceFormat` on the first non-JPEG
/// source. The batch stops there: no backup and no output manifest are
/// written. Missing images are recorded in the report instead.
pub fn bake_navigation_manifest(
    manifest_path: &Path,
    config: &BakeConfig,
) -> Result<BatchReport, BakeError> {
    if !manifest_path.is_file() {
        return Err(BakeError::ManifestNotFound(manifest_path.to_path_buf()));
    }

    let manifest = NavigationManifest::load(manifest_path)?;
    let images = manifest.image_refs();
    let count = config.take_count(images.len());
    info!(
        manifest = %manifest_path.display(),
        images = images.len(),
        processing = count,
        dry_run = config.dry_run,
        "Baking navigation rotations"
    );

    let mut report = BatchReport::new(config.dry_run);
    let mut processed = HashMap::with_capacity(count);

    for image in &images[..count] {
        let angle = -image.rotation_correction;
        match bake_sphere(&image.image_path, angle, config) {
            Ok(reference) => {
                processed.insert(image.image_path.clone(), reference);
                report.succeeded += 1;
            }
            Err(err) if err.is_fatal() => {
                error!(image = %image.image_path, error = %err, "Aborting navigation batch");
                return Err(err);
            }
            Err(err) => {
                warn!(image = %image.image_path, error = %err, "Image skipped");
                report.record_failure(image.image_path.clone(), &err);
            }
        }
    }

    let (document, updated) = manifest.rewritten(&processed);
    let output = NavigationManifest::output_path(manifest_path, &config.output_suffix);
    info!(entries = updated, "Updated imagePath entries");

    if config.dry_run {
        debug!(output = %output.display(), "Dry run: would write manifest");
    } else {
        let now = Local::now();
        let backup = backup_manifest(manifest_path, &now)?;
        info!(backup = %backup.display(), "Backed up input manifest");

        write_json_atomic(&output, &document)?;
        info!(output = %output.display(), "Wrote processed manifest");

        report.backup = Some(backup);
        report.output_manifest = Some(output);
    }

    info!(succeeded = report.succeeded, failed = report.failed(), "Navigation batch complete");
    Ok(report)
}

/// Shift one image by `angle` degrees of yaw and return its manifest reference.
///
/// # Errors
///
/// Returns `BakeError::MissingSourceFile` if the image does not exist and
/// `BakeError::UnsupportedSourceFormat` if it is not a JPEG.
pub fn bake_sphere(image_path: &str, angle: f64, config: &BakeConfig) -> Result<String, BakeError> {
    let source = config.resolve(image_path);
    if !source.is_file() {
        return Err(BakeError::MissingSourceFile(source));
    }
    if !is_jpeg_source(&source) {
        return Err(BakeError::UnsupportedSourceFormat(source));
    }

    let target = processed_target(&config.base_dir, image_path, &config.processed_dir_name)
        .ok_or_else(|| BakeError::MissingSourceFile(source.clone()))?;

    if config.dry_run {
        debug!(
            source = %source.display(),
            target = %target.file.display(),
            rotation = format_args!("{angle:.2}"),
            "Dry run: would bake image"
        );
        return Ok(target.reference);
    }

    let raster = load_raster(&source)?;
    let shifted = shift_yaw(&raster, angle)?;
    let bytes = encode_jpeg(&shifted, config.quality)?;
    write_atomic(&target.file, &bytes).map_err(|e| BakeError::io(&target.file, e))?;

    info!(
        output = %target.file.display(),
        width = shifted.width,
        height = shifted.height,
        rotation = format_args!("{angle:.2}"),
        "Baked image"
    );
    Ok(target.reference)
}
