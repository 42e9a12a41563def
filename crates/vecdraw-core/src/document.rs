//! JSON document format: `{ "version": 1, "shapes": [ ... ] }`.

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The only document version this build reads and writes.
pub const DOCUMENT_VERSION: u64 = 1;

/// Document parsing errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid file format: {0}")]
    InvalidFormat(&'static str),
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(u64),
}

/// A saved set of shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    #[serde(default = "default_version")]
    pub version: u64,
    pub shapes: Vec<Shape>,
}

fn default_version() -> u64 {
    DOCUMENT_VERSION
}

impl Default for ShapeDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ShapeDocument {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            shapes,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document.
    ///
    /// The top level must be an object whose `shapes` field is an array. A
    /// missing `version` is read as version 1. Array entries that are not a
    /// recognizable shape record are skipped with a warning so the rest of
    /// the document still loads.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let data: Value = serde_json::from_str(json)?;
        let object = data
            .as_object()
            .ok_or(DocumentError::InvalidFormat("expected a JSON object"))?;

        let version = match object.get("version") {
            None => DOCUMENT_VERSION,
            Some(v) => v
                .as_u64()
                .ok_or(DocumentError::InvalidFormat("version must be an integer"))?,
        };
        if version != DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(version));
        }

        let entries = object
            .get("shapes")
            .and_then(Value::as_array)
            .ok_or(DocumentError::InvalidFormat("missing 'shapes' array"))?;

        let mut shapes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match Shape::deserialize(entry) {
                Ok(shape) => shapes.push(shape),
                Err(e) => log::warn!("Skipping shape record {}: {}", index, e),
            }
        }

        Ok(Self { version, shapes })
    }
}
