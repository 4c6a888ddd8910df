use serde_json::{Map, Value};
use thiserror::Error;

/// One spreadsheet row: an insertion-ordered JSON object.
pub type Record = Map<String, Value>;
/// The full ordered array of records currently loaded in the editor.
pub type Dataset = Vec<Record>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("JSON root is not an array")]
    NotAnArray,
    #[error("JSON array contains non-object elements")]
    NotArrayOfObjects,
}

/// Builds a dataset from an arbitrary JSON value. Arrays must contain only
/// objects; a single object becomes a one-row dataset; a bare scalar is
/// wrapped as `{"value": <scalar>}`.
pub fn dataset_from_value(value: Value) -> Result<Dataset, ShapeError> {
    match value {
        Value::Array(items) => {
            let mut data = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(record) => data.push(record),
                    _ => return Err(ShapeError::NotArrayOfObjects),
                }
            }
            Ok(data)
        }
        Value::Object(record) => Ok(vec![record]),
        scalar => {
            let mut record = Record::new();
            record.insert("value".to_string(), scalar);
            Ok(vec![record])
        }
    }
}

/// Formats a JSON value for display in a grid cell. Nested values degrade to
/// their JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// `""` and `null` count as empty for row-filtering purposes.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

pub fn record_is_empty(record: &Record) -> bool {
    record.values().all(is_empty_value)
}

/// Drops records where every field is empty. The render pass keeps the
/// unfiltered dataset so virtual rows do not vanish mid-edit.
pub fn drop_empty_records(data: &Dataset) -> Dataset {
    data.iter()
        .filter(|record| !record_is_empty(record))
        .cloned()
        .collect()
}

/// Outcome of a cell write: the padded dataset for rendering and the
/// empty-row-filtered dataset callers persist.
#[derive(Clone, Debug, PartialEq)]
pub struct CellWrite {
    pub render: Dataset,
    pub persisted: Dataset,
}

/// Writes `value` at (`row`, `key`), padding with empty records when the row
/// lies beyond the dataset. Total for any well-formed dataset.
pub fn set_cell(data: &Dataset, row: usize, key: &str, value: Value) -> CellWrite {
    let mut render = data.clone();
    while render.len() <= row {
        render.push(Record::new());
    }
    render[row].insert(key.to_string(), value);

    let persisted = drop_empty_records(&render);
    CellWrite { render, persisted }
}

/// Reads the value at (`row`, `key`), or null when the row or key is absent.
pub fn value_at(data: &Dataset, row: usize, key: &str) -> Value {
    data.get(row)
        .and_then(|record| record.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn add_row(data: &Dataset) -> Dataset {
    let mut next = data.clone();
    next.push(Record::new());
    next
}

pub fn remove_row(data: &Dataset, index: usize) -> Dataset {
    data.iter()
        .enumerate()
        .filter_map(|(i, record)| (i != index).then(|| record.clone()))
        .collect()
}

/// Adds `key` with `default` to every record. A dataset with no rows gains
/// one so the column has somewhere to live.
pub fn add_column(data: &Dataset, key: &str, default: Value) -> Dataset {
    if data.is_empty() {
        let mut record = Record::new();
        record.insert(key.to_string(), default);
        return vec![record];
    }

    data.iter()
        .map(|record| {
            let mut next = record.clone();
            next.insert(key.to_string(), default.clone());
            next
        })
        .collect()
}

pub fn remove_column(data: &Dataset, key: &str) -> Dataset {
    data.iter()
        .map(|record| {
            let mut next = record.clone();
            next.shift_remove(key);
            next
        })
        .collect()
}

/// Fills missing keys with null so every record carries the full key union.
pub fn normalize_dataset(data: &Dataset) -> Dataset {
    let keys = key_union(data);
    data.iter()
        .map(|record| {
            let mut next = Record::new();
            for key in &keys {
                next.insert(key.clone(), record.get(key).cloned().unwrap_or(Value::Null));
            }
            next
        })
        .collect()
}

/// Union of keys across all records, in first-seen order.
pub fn key_union(data: &Dataset) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for record in data {
        for key in record.keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

/// Best-effort typed interpretation of raw cell input: integer, float,
/// boolean, else string. Empty input stays an empty string so the row-filter
/// pass can drop rows cleared by the user.
pub fn parse_cell_input(input: &str) -> Value {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    if looks_numeric(trimmed) {
        if let Some(n) = trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(n);
        }
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(input.to_string())
}

/// Guards the float parse so words Rust accepts ("inf", "NaN") stay strings.
pub(crate) fn looks_numeric(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
        && s.bytes().any(|b| b.is_ascii_digit())
}
