//! Navigation manifest used by the yaw-only bake.
//!
//! The document has no fixed schema. Any JSON object carrying an `imagePath`
//! key is an image entry, wherever it sits in the tree, and may carry a
//! `rotationCorrection` in degrees.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{read_json, ManifestError};

const IMAGE_PATH_KEY: &str = "imagePath";
const ROTATION_CORRECTION_KEY: &str = "rotationCorrection";

/// A unique image referenced by the navigation document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub image_path: String,
    /// Correction in degrees from the first entry for this path that has one.
    pub rotation_correction: f64,
}

/// A navigation document held as a JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationManifest {
    document: Value,
}

impl NavigationManifest {
    /// Read a navigation manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        Ok(Self::from_value(read_json(path)?))
    }

    /// Wrap an already parsed document.
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    /// The document as read.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Unique image paths in discovery order.
    pub fn image_refs(&self) -> Vec<ImageRef> {
        let mut entries = Vec::new();
        collect_entries(&self.document, &mut entries);

        let mut seen = HashSet::new();
        let mut refs = Vec::new();
        for entry in &entries {
            let Some(path) = image_path_of(entry) else {
                continue;
            };
            if !seen.insert(path) {
                continue;
            }
            let rotation_correction = entries
                .iter()
                .find(|e| image_path_of(e) == Some(path) && e.contains_key(ROTATION_CORRECTION_KEY))
                .map_or(0.0, |e| parse_correction(&e[ROTATION_CORRECTION_KEY]));

            refs.push(ImageRef {
                image_path: path.to_string(),
                rotation_correction,
            });
        }
        refs
    }

    /// Copy of the document with baked paths substituted.
    ///
    /// Every entry whose `imagePath` is a key of `processed` points at the
    /// mapped path and has its `rotationCorrection` zeroed when present.
    /// Spheres under `paths[*].spheres` are ordered by lower-cased `imagePath`.
    /// Returns the new document and the number of entries rewritten.
    pub fn rewritten(&self, processed: &HashMap<String, String>) -> (Value, usize) {
        let mut document = self.document.clone();
        let mut updated = 0;

        visit_entries_mut(&mut document, &mut |entry| {
            let Some(target) = image_path_of(entry).and_then(|p| processed.get(p)) else {
                return;
            };
            entry.insert(IMAGE_PATH_KEY.to_string(), Value::String(target.clone()));
            if let Some(correction) = entry.get_mut(ROTATION_CORRECTION_KEY) {
                *correction = Value::from(0);
            }
            updated += 1;
        });

        sort_spheres(&mut document);
        (document, updated)
    }

    /// `<stem><suffix>.<ext>` next to `input`.
    pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match input.extension() {
            Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
            None => format!("{stem}{suffix}"),
        };
        input.with_file_name(name)
    }
}

fn image_path_of(entry: &Map<String, Value>) -> Option<&str> {
    entry
        .get(IMAGE_PATH_KEY)
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
}

/// Numbers and numeric strings; anything else reads as no correction.
fn parse_correction(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Pre-order walk: an entry is reported before any entries nested inside it.
fn collect_entries<'a>(value: &'a Value, found: &mut Vec<&'a Map<String, Value>>) {
    match value {
        Value::Object(map) => {
            if map.contains_key(IMAGE_PATH_KEY) {
                found.push(map);
            }
            for child in map.values() {
                collect_entries(child, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_entries(item, found);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn visit_entries_mut(value: &mut Value, visit: &mut impl FnMut(&mut Map<String, Value>)) {
    match value {
        Value::Object(map) => {
            if map.contains_key(IMAGE_PATH_KEY) {
                visit(map);
            }
            for child in map.values_mut() {
                visit_entries_mut(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                visit_entries_mut(item, visit);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn sort_spheres(document: &mut Value) {
    let Some(paths) = document.get_mut("paths").and_then(Value::as_array_mut) else {
        return;
    };
    for path in paths {
        if let Some(spheres) = path.get_mut("spheres").and_then(Value::as_array_mut) {
            spheres.sort_by_key(|sphere| {
                sphere
                    .get(IMAGE_PATH_KEY)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_lowercase()
            });
        }
    }
}
