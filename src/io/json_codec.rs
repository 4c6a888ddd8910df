use serde_json::Value;
use thiserror::Error;

use crate::state::data_model::{self, Dataset, ShapeError};

#[derive(Debug, Error)]
pub enum JsonCodecError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Parses full JSON text into a dataset: an array of objects as-is, a single
/// object wrapped in a one-element array.
pub fn parse_json(text: &str) -> Result<Dataset, JsonCodecError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(data_model::dataset_from_value(value)?)
}

/// Pretty-printed with a 2-space indent.
pub fn format_json(data: &Dataset) -> Result<String, JsonCodecError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Syntax-only check backing the raw-JSON editor pane.
pub fn validate_json(text: &str) -> Result<(), JsonCodecError> {
    serde_json::from_str::<Value>(text)?;
    Ok(())
}
