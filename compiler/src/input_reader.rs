use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::constants::STATIC_WAIT;
use crate::errors::LoadError;
use crate::structures::Document;

/// Reads a persisted input document. Current files wrap the screens under
/// a "Screens" key with a "Wait_time" next to it; the oldest files are the
/// bare screen map and imply a static wait.
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;

    let wrapped = value
        .as_object()
        .map(|document| document.contains_key("Screens"))
        .unwrap_or(false);

    let document = if wrapped {
        serde_json::from_value(value)?
    } else {
        Document {
            screens: serde_json::from_value(value)?,
            wait_time: STATIC_WAIT,
        }
    };
    Ok(document)
}
