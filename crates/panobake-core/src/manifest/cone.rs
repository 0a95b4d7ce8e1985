//! Cone export manifest used by the full 3-axis bake.

use std::path::Path;

use chrono::{DateTime, Local};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::{read_json, ManifestError};
use crate::orientation::{DirectionBasis, OrientationError};

/// A 3-component vector as it appears in manifest JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsonVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl JsonVector {
    /// Vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<JsonVector> for Vector3<f64> {
    fn from(v: JsonVector) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

/// Capture-frame (Z-up) camera direction of a cone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeDirection {
    pub forward: JsonVector,
    pub up: JsonVector,
}

impl ConeDirection {
    /// Engine forward=+Z, up=+Y expressed in the capture frame.
    ///
    /// Written out explicitly so baked manifests carry `-1.0`/`0.0`, never `-0.0`.
    pub const CANONICAL: Self = Self {
        forward: JsonVector::new(0.0, -1.0, 0.0),
        up: JsonVector::new(0.0, 0.0, 1.0),
    };

    /// Normalized engine-frame basis for this capture-frame direction.
    pub fn to_basis(&self) -> Result<DirectionBasis, OrientationError> {
        DirectionBasis::from_capture_frame(self.forward.into(), self.up.into())
    }

    /// JSON form as written into manifests.
    pub fn to_value(&self) -> Value {
        let vector = |v: &JsonVector| json!({ "x": v.x, "y": v.y, "z": v.z });
        json!({ "forward": vector(&self.forward), "up": vector(&self.up) })
    }
}

/// Why a cone's orientation could not be turned into a basis.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectionError {
    #[error("no direction data")]
    Missing,

    #[error("malformed direction data: {0}")]
    Malformed(String),

    #[error(transparent)]
    Degenerate(#[from] OrientationError),
}

/// One cone (panorama capture) of the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeEntry {
    pub cone_id: i64,
    pub image_path: String,

    /// Kept as raw JSON so a malformed direction fails only this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_image_path: Option<String>,

    /// Capture direction before baking, kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_direction: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_baked: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConeEntry {
    /// Parse the stored direction into a normalized engine-frame basis.
    pub fn direction_basis(&self) -> Result<DirectionBasis, DirectionError> {
        let Some(value) = self.direction.as_ref().filter(|v| has_both_vectors(v)) else {
            return Err(DirectionError::Missing);
        };
        let direction: ConeDirection = serde_json::from_value(value.clone())
            .map_err(|e| DirectionError::Malformed(e.to_string()))?;
        Ok(direction.to_basis()?)
    }

    /// The output entry for this cone once its image has been baked.
    pub fn baked(&self, processed_path: String) -> ConeEntry {
        ConeEntry {
            cone_id: self.cone_id,
            original_image_path: Some(self.image_path.clone()),
            original_direction: self.direction.clone(),
            image_path: processed_path,
            direction: Some(ConeDirection::CANONICAL.to_value()),
            rotation_baked: Some(true),
            extra: self.extra.clone(),
        }
    }
}

fn has_both_vectors(direction: &Value) -> bool {
    let present = |key: &str| direction.get(key).is_some_and(|v| !v.is_null());
    present("forward") && present("up")
}

/// The cone export document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConeManifest {
    #[serde(default)]
    pub export_info: Map<String, Value>,

    #[serde(default)]
    pub cones: Vec<ConeEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConeManifest {
    /// Read a cone manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        read_json(path)
    }

    /// Output manifest listing only `cones`, with bake metadata recorded in `export_info`.
    pub fn baked(
        &self,
        cones: Vec<ConeEntry>,
        original_file: &Path,
        timestamp: &DateTime<Local>,
    ) -> ConeManifest {
        let mut export_info = self.export_info.clone();
        export_info.insert(
            "processing_timestamp".to_string(),
            Value::String(timestamp.to_rfc3339()),
        );
        export_info.insert("rotation_baked".to_string(), Value::Bool(true));
        export_info.insert(
            "original_file".to_string(),
            Value::String(original_file.display().to_string()),
        );

        ConeManifest {
            export_info,
            cones,
            extra: self.extra.clone(),
        }
    }
}
