//! # Label Schema
//!
//! The fixed mapping from NER label strings (`O`, `B-LOC`, ...) to class ids,
//! loaded from a JSON object.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{read_file, Result, SeqtagError};

/// Label id used for padded positions; ignored by the loss.
pub const IGNORE_LABEL: i64 = -1;

/// Bijective label ↔ class id table.
#[derive(Debug, Clone)]
pub struct LabelSchema {
    label_to_id: HashMap<String, i64>,
    id_to_label: HashMap<i64, String>,
}

impl LabelSchema {
    /// Load a schema file such as `{"O": 0, "B-LOC": 1}`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let schema = Self::from_json(&read_file(path)?)?;
        debug!(path = %path.display(), labels = schema.len(), "loaded label schema");
        Ok(schema)
    }

    /// Parse a schema from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: HashMap<String, i64> = serde_json::from_str(json)?;
        Self::from_map(map)
    }

    /// Build a schema, rejecting negative or duplicate class ids.
    pub fn from_map(label_to_id: HashMap<String, i64>) -> Result<Self> {
        let mut id_to_label = HashMap::with_capacity(label_to_id.len());
        for (label, &id) in &label_to_id {
            if id < 0 {
                return Err(SeqtagError::InvalidSchema(format!(
                    "label {label:?} has negative id {id}"
                )));
            }
            if let Some(other) = id_to_label.insert(id, label.clone()) {
                return Err(SeqtagError::InvalidSchema(format!(
                    "labels {other:?} and {label:?} share id {id}"
                )));
            }
        }

        Ok(Self {
            label_to_id,
            id_to_label,
        })
    }

    pub fn len(&self) -> usize {
        self.label_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_to_id.is_empty()
    }

    /// Class id of `label`.
    pub fn id(&self, label: &str) -> Option<i64> {
        self.label_to_id.get(label).copied()
    }

    /// Label for a class id. Padding and unknown ids return `None`.
    pub fn label(&self, id: i64) -> Option<&str> {
        self.id_to_label.get(&id).map(String::as_str)
    }
}
