use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::data_model::{self, Dataset};

pub const DEFAULT_COLUMN_WIDTH: u32 = 150;

const VIRTUAL_COLUMN_PREFIX: &str = "virtual_col_";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Boolean,
    Date,
}

/// A derived column: identified by record key, never stored in the dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub width: u32,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(key: &str, kind: ColumnKind) -> Self {
        Self {
            id: key.to_string(),
            title: key.to_string(),
            width: DEFAULT_COLUMN_WIDTH,
            kind,
        }
    }

    /// A synthesized column beyond the real key set, holding no data until
    /// written. `index` is its absolute position in the grid.
    pub fn virtual_at(index: usize) -> Self {
        Self {
            id: virtual_column_id(index),
            title: format!("Column {}", index + 1),
            width: DEFAULT_COLUMN_WIDTH,
            kind: ColumnKind::Text,
        }
    }

    pub fn is_virtual(&self) -> bool {
        is_virtual_column(&self.id)
    }
}

pub fn virtual_column_id(index: usize) -> String {
    format!("{VIRTUAL_COLUMN_PREFIX}{index}")
}

pub fn is_virtual_column(id: &str) -> bool {
    id.starts_with(VIRTUAL_COLUMN_PREFIX)
}

/// Computes the ordered key union across all records, one column per key in
/// first-seen order, each tagged with an inferred kind.
pub fn build_columns(data: &Dataset) -> Vec<Column> {
    data_model::key_union(data)
        .into_iter()
        .map(|key| {
            let kind = detect_column_kind(data, &key);
            Column::new(&key, kind)
        })
        .collect()
}

/// Infers a column's kind from its first non-null value only. Mixed-type
/// columns keep the first-seen kind; this is a heuristic, not a guarantee.
pub fn detect_column_kind(data: &Dataset, key: &str) -> ColumnKind {
    let values: Vec<&Value> = data
        .iter()
        .filter_map(|record| record.get(key))
        .filter(|v| !v.is_null())
        .collect();

    let Some(first) = values.first() else {
        return ColumnKind::Text;
    };

    match first {
        Value::Bool(_) => ColumnKind::Boolean,
        Value::Number(_) => ColumnKind::Number,
        Value::String(_) => {
            let all_dates = values.iter().all(|v| match v {
                Value::String(s) => looks_like_iso_date(s),
                _ => false,
            });
            if all_dates {
                ColumnKind::Date
            } else {
                ColumnKind::Text
            }
        }
        _ => ColumnKind::Text,
    }
}

/// ISO-like date prefix: `YYYY-MM-DD`.
pub fn looks_like_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// Value at a grid position, or null for virtual and out-of-range cells.
pub fn cell_at(data: &Dataset, columns: &[Column], row: usize, col: usize) -> Value {
    let Some(column) = columns.get(col) else {
        return Value::Null;
    };
    data_model::value_at(data, row, &column.id)
}
