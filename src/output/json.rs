//! JSON output of classifications.

use crate::models::Classification;
use std::error::Error;

/// Pretty-printed JSON for a [`Classification`].
pub fn classification_json(classification: &Classification) -> Result<String, Box<dyn Error>> {
    serde_json::to_string_pretty(classification)
        .map_err(|e| format!("Error serializing JSON: {e}").into())
}
