use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::csv_codec::{self, CsvCodecError};
use crate::io::json_codec::{self, JsonCodecError};
use crate::state::columns::{self, ColumnKind};
use crate::state::data_model::{self, Dataset};

/// Default upload ceiling; larger files block the single-threaded parse for
/// too long to be worth accepting.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const MAX_FILENAME_LEN: usize = 255;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Json,
    Csv,
    Xlsx,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xls",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file is {size} bytes; the limit is {limit} bytes (10MB)")]
    TooLarge { size: u64, limit: u64 },
    #[error("unrecognized file type '.{0}'; expected .json, .csv, or .txt")]
    UnsupportedExtension(String),
    #[error("filename is invalid or too long")]
    InvalidFilename,
    #[error("failed to parse file: {0}")]
    Json(#[from] JsonCodecError),
    #[error("failed to parse file: {0}")]
    Csv(#[from] CsvCodecError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// Import format by extension. `.txt` gets the JSON parser; spreadsheet
/// binaries are not importable.
pub fn detect_format(filename: &str) -> Option<FileFormat> {
    let extension = filename.rsplit('.').next()?.to_lowercase();
    match extension.as_str() {
        "json" | "txt" => Some(FileFormat::Json),
        "csv" => Some(FileFormat::Csv),
        _ => None,
    }
}

/// Gates a file before any parsing: size ceiling, recognized extension, and
/// a sane filename. Returns the detected format on success.
pub fn validate_upload(
    filename: &str,
    size: u64,
    limits: UploadLimits,
) -> Result<FileFormat, UploadError> {
    if size > limits.max_bytes {
        return Err(UploadError::TooLarge {
            size,
            limit: limits.max_bytes,
        });
    }

    if filename.is_empty()
        || filename.len() > MAX_FILENAME_LEN
        || filename.contains("..")
        || filename.contains(['<', '>', ':', '|', '?', '*'])
    {
        return Err(UploadError::InvalidFilename);
    }

    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    detect_format(filename).ok_or(UploadError::UnsupportedExtension(extension))
}

/// Full import path: gate, then dispatch to the matching codec. Parser
/// failures come back as descriptive error values, never panics.
pub fn import_text(filename: &str, text: &str) -> Result<Dataset, UploadError> {
    let format = validate_upload(filename, text.len() as u64, UploadLimits::default())?;
    match format {
        FileFormat::Json => Ok(json_codec::parse_json(text)?),
        FileFormat::Csv => Ok(csv_codec::parse_csv(text)?),
        FileFormat::Xlsx => {
            Err(UploadError::UnsupportedExtension("xlsx".to_string()))
        }
    }
}

/// Row/column counts and per-column type tags backing the export dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportStats {
    pub total_rows: usize,
    pub total_columns: usize,
    pub column_names: Vec<String>,
    pub column_kinds: Vec<(String, ColumnKind)>,
}

pub fn export_stats(data: &Dataset) -> ExportStats {
    let column_names = data_model::key_union(data);
    let column_kinds = column_names
        .iter()
        .map(|key| (key.clone(), columns::detect_column_kind(data, key)))
        .collect();
    ExportStats {
        total_rows: data.len(),
        total_columns: column_names.len(),
        column_names,
        column_kinds,
    }
}
