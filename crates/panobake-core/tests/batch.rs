//! End-to-end batch scenarios against a temporary site directory.

use std::fs;
use std::path::{Path, PathBuf};

use panobake_core::batch::{backup_path_for, bake_cone_manifest, bake_navigation_manifest, BakeConfig};
use panobake_core::{encode_jpeg, load_raster, BakeError, PanoramaRaster};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Left half black, right half white.
fn split_raster() -> PanoramaRaster {
    PanoramaRaster::from_fn(64, 32, |_, col| if col < 32 { [0; 3] } else { [255; 3] })
}

fn write_jpeg(site: &Path, relative: &str) {
    let path = site.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, encode_jpeg(&split_raster(), 95).unwrap()).unwrap();
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().contains(".bak."))
        .collect()
}

fn luma(raster: &PanoramaRaster, row: u32, col: u32) -> u8 {
    raster.pixel(row, col)[0]
}

struct ConeSite {
    dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

fn cone_site(cones: Value) -> ConeSite {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(dir.path(), "panoramas/cone1.jpg");
    write_jpeg(dir.path(), "panoramas/cone2.jpg");

    let input = dir.path().join("cone_data.json");
    write_json(
        &input,
        &json!({
            "export_info": {"exported_from": "site.dxf"},
            "cones": cones,
        }),
    );
    let output = dir.path().join("cone_data_processed.json");
    ConeSite { dir, input, output }
}

fn east_facing(cone_id: i64, image: &str) -> Value {
    json!({
        "cone_id": cone_id,
        "image_path": image,
        "direction": {"forward": {"x": 1.0, "y": 0.0, "z": 0.0}, "up": {"x": 0.0, "y": 0.0, "z": 1.0}}
    })
}

#[test]
fn cone_batch_skips_entry_without_direction() {
    let site = cone_site(json!([
        east_facing(1, "panoramas/cone1.jpg"),
        {"cone_id": 2, "image_path": "panoramas/cone2.jpg"}
    ]));
    let original = fs::read(&site.input).unwrap();
    let config = BakeConfig::default().with_base_dir(site.dir.path());

    let report = bake_cone_manifest(&site.input, &site.output, &config).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].entry, "cone 2");
    assert!(!report.is_success());

    let out = read_json(&site.output);
    let cones = out["cones"].as_array().unwrap();
    assert_eq!(cones.len(), 1);
    assert_eq!(cones[0]["cone_id"], 1);
    assert_eq!(cones[0]["image_path"], "panoramas/processed/cone1.jpg");
    assert_eq!(cones[0]["original_image_path"], "panoramas/cone1.jpg");
    assert_eq!(cones[0]["original_direction"]["forward"]["x"], 1.0);
    assert_eq!(cones[0]["original_direction"]["up"]["z"], 1.0);
    assert_eq!(cones[0]["rotation_baked"], true);
    assert_eq!(
        cones[0]["direction"],
        json!({"forward": {"x": 0.0, "y": -1.0, "z": 0.0}, "up": {"x": 0.0, "y": 0.0, "z": 1.0}})
    );
    assert_eq!(out["export_info"]["exported_from"], "site.dxf");
    assert_eq!(out["export_info"]["rotation_baked"], true);
    assert!(out["export_info"]["processing_timestamp"].is_string());

    // Source untouched, backup byte-identical to it.
    assert_eq!(fs::read(&site.input).unwrap(), original);
    let backup = report.backup.expect("backup written");
    assert_eq!(fs::read(&backup).unwrap(), original);
    assert_eq!(report.output_manifest.as_deref(), Some(site.output.as_path()));
}

#[test]
fn cone_batch_bakes_rotated_image() {
    let site = cone_site(json!([east_facing(1, "panoramas/cone1.jpg")]));
    let config = BakeConfig::default().with_base_dir(site.dir.path());

    let report = bake_cone_manifest(&site.input, &site.output, &config).unwrap();
    assert!(report.is_success());

    let baked = load_raster(&site.dir.path().join("panoramas/processed/cone1.jpg")).unwrap();
    assert_eq!((baked.width, baked.height), (64, 32));

    // Facing east is yaw -90: content moves a quarter turn towards lower columns.
    assert!(luma(&baked, 16, 8) < 60, "expected dark at col 8");
    assert!(luma(&baked, 16, 24) > 200, "expected bright at col 24");
    assert!(luma(&baked, 16, 56) < 60, "expected dark at col 56");

    let source = load_raster(&site.dir.path().join("panoramas/cone1.jpg")).unwrap();
    assert!(luma(&source, 16, 8) < 60);
}

#[test]
fn cone_batch_respects_limit() {
    let site = cone_site(json!([
        east_facing(1, "panoramas/cone1.jpg"),
        east_facing(2, "panoramas/cone2.jpg")
    ]));
    let config = BakeConfig::default()
        .with_base_dir(site.dir.path())
        .with_limit(Some(1));

    let report = bake_cone_manifest(&site.input, &site.output, &config).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(read_json(&site.output)["cones"].as_array().unwrap().len(), 1);
    assert!(!site.dir.path().join("panoramas/processed/cone2.jpg").exists());
}

#[test]
fn cone_batch_dry_run_writes_nothing() {
    let site = cone_site(json!([east_facing(1, "panoramas/cone1.jpg")]));
    let config = BakeConfig::default()
        .with_base_dir(site.dir.path())
        .with_dry_run(true);

    let report = bake_cone_manifest(&site.input, &site.output, &config).unwrap();

    assert_eq!(report.succeeded, 1);
    assert!(report.dry_run);
    assert!(report.output_manifest.is_none());
    assert!(!site.output.exists());
    assert!(!site.dir.path().join("panoramas/processed").exists());
    assert!(backups_in(site.dir.path()).is_empty());
}

#[test]
fn cone_batch_with_no_success_writes_no_manifest() {
    let site = cone_site(json!([{"cone_id": 5, "image_path": "panoramas/missing.jpg"}]));
    let config = BakeConfig::default().with_base_dir(site.dir.path());

    let report = bake_cone_manifest(&site.input, &site.output, &config).unwrap();

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed(), 1);
    assert!(!site.output.exists());
    assert!(backups_in(site.dir.path()).is_empty());
}

#[test]
fn cone_batch_manifest_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = BakeConfig::default().with_base_dir(dir.path());
    let output = dir.path().join("out.json");

    let missing = dir.path().join("absent.json");
    assert!(matches!(
        bake_cone_manifest(&missing, &output, &config),
        Err(BakeError::ManifestNotFound(_))
    ));

    let empty = dir.path().join("empty.json");
    write_json(&empty, &json!({"export_info": {}, "cones": []}));
    assert!(matches!(
        bake_cone_manifest(&empty, &output, &config),
        Err(BakeError::NoEntries(_))
    ));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, b"{\"cones\": [").unwrap();
    assert!(matches!(
        bake_cone_manifest(&broken, &output, &config),
        Err(BakeError::Manifest(_))
    ));
}

fn navigation_site(spheres: Value) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("360-navigation-data.json");
    write_json(
        &manifest,
        &json!({
            "title": "Site walk",
            "paths": [{"name": "main", "spheres": spheres}]
        }),
    );
    (dir, manifest)
}

#[test]
fn navigation_batch_bakes_and_rewrites() {
    let (dir, manifest) = navigation_site(json!([
        {"imagePath": "pano/b.jpg", "rotationCorrection": 0},
        {"imagePath": "pano/a.jpg", "rotationCorrection": -90}
    ]));
    write_jpeg(dir.path(), "pano/a.jpg");
    write_jpeg(dir.path(), "pano/b.jpg");
    let original = fs::read(&manifest).unwrap();
    let config = BakeConfig::navigation().with_base_dir(dir.path());

    let report = bake_navigation_manifest(&manifest, &config).unwrap();

    assert_eq!(report.succeeded, 2);
    assert!(report.is_success());
    let output = dir.path().join("360-navigation-data-processed.json");
    assert_eq!(report.output_manifest.as_deref(), Some(output.as_path()));

    let out = read_json(&output);
    assert_eq!(out["title"], "Site walk");
    let spheres = out["paths"][0]["spheres"].as_array().unwrap();
    assert_eq!(spheres[0]["imagePath"], "pano/processed/a.jpg");
    assert_eq!(spheres[1]["imagePath"], "pano/processed/b.jpg");
    assert_eq!(spheres[0]["rotationCorrection"], 0);

    // Correction -90 is applied as +90: content moves towards higher columns.
    let baked = load_raster(&dir.path().join("pano/processed/a.jpg")).unwrap();
    assert_eq!((baked.width, baked.height), (64, 32));
    assert!(luma(&baked, 16, 8) > 200, "expected bright at col 8");
    assert!(luma(&baked, 16, 30) < 60, "expected dark at col 30");
    assert!(luma(&baked, 16, 56) > 200, "expected bright at col 56");

    assert_eq!(fs::read(&manifest).unwrap(), original);
    assert_eq!(fs::read(report.backup.unwrap()).unwrap(), original);
}

#[test]
fn navigation_batch_aborts_on_non_jpeg_source() {
    let (dir, manifest) = navigation_site(json!([
        {"imagePath": "pano/a.jpg", "rotationCorrection": 10},
        {"imagePath": "pano/b.png", "rotationCorrection": 20}
    ]));
    write_jpeg(dir.path(), "pano/a.jpg");
    fs::write(dir.path().join("pano/b.png"), b"\x89PNG\r\n\x1a\n").unwrap();
    let original = fs::read(&manifest).unwrap();
    let config = BakeConfig::navigation().with_base_dir(dir.path());

    let err = bake_navigation_manifest(&manifest, &config).unwrap_err();

    assert!(matches!(err, BakeError::UnsupportedSourceFormat(_)));
    assert!(err.is_fatal());
    assert!(!dir.path().join("360-navigation-data-processed.json").exists());
    assert!(backups_in(dir.path()).is_empty());
    assert_eq!(fs::read(&manifest).unwrap(), original);
}

#[test]
fn navigation_batch_records_missing_images() {
    let (dir, manifest) = navigation_site(json!([
        {"imagePath": "pano/a.jpg", "rotationCorrection": 10},
        {"imagePath": "pano/gone.jpg", "rotationCorrection": 20}
    ]));
    write_jpeg(dir.path(), "pano/a.jpg");
    let config = BakeConfig::navigation().with_base_dir(dir.path());

    let report = bake_navigation_manifest(&manifest, &config).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures[0].entry, "pano/gone.jpg");
    let out = read_json(report.output_manifest.as_deref().unwrap());
    let spheres = out["paths"][0]["spheres"].as_array().unwrap();
    // Unbaked entries keep their path and correction; "pano/gone" sorts first.
    assert_eq!(spheres[0]["imagePath"], "pano/gone.jpg");
    assert_eq!(spheres[0]["rotationCorrection"], 20);
    assert_eq!(spheres[1]["imagePath"], "pano/processed/a.jpg");
}

#[test]
fn backup_name_uses_timestamp_before_extension() {
    let stamp = chrono::Local::now();
    let backup = backup_path_for(Path::new("site/cone_data.json"), &stamp);
    let name = backup.file_name().unwrap().to_string_lossy().into_owned();

    assert!(name.starts_with("cone_data.bak."));
    assert!(name.ends_with(".json"));
    assert_eq!(name.len(), "cone_data.bak.YYYYmmdd-HHMMSS.json".len());
}
