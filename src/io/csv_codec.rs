use csv::Trim;
use serde_json::Value;
use thiserror::Error;

use crate::state::data_model::{self, Dataset, Record};

#[derive(Debug, Error)]
pub enum CsvCodecError {
    #[error("invalid CSV: {0}")]
    Parse(#[from] csv::Error),
}

/// Parses RFC4180 CSV: the first record is the header row, `""` escapes a
/// quote, and commas/newlines are legal inside quoted fields. Fields are
/// trimmed of surrounding whitespace, blank records are skipped, and short
/// rows fill missing fields with `""`. Cells are coerced
/// number -> boolean -> string, best effort.
pub fn parse_csv(text: &str) -> Result<Dataset, CsvCodecError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut data = Dataset::new();
    for result in reader.records() {
        let fields = result?;
        if fields.iter().all(|field| field.is_empty()) {
            continue;
        }
        let mut record = Record::new();
        for (idx, header) in headers.iter().enumerate() {
            let raw = fields.get(idx).unwrap_or("");
            record.insert(header.clone(), coerce_csv_value(raw));
        }
        data.push(record);
    }
    Ok(data)
}

/// Serializes the key union as a header row and every record beneath it.
/// Values containing a comma, quote or newline are quoted with internal
/// quotes doubled; null and missing fields render empty. No trailing
/// newline.
pub fn to_csv(data: &Dataset) -> String {
    if data.is_empty() {
        return String::new();
    }

    let headers = data_model::key_union(data);
    match write_records(&headers, data) {
        Ok(text) => match text.strip_suffix('\n') {
            Some(trimmed) => trimmed.to_string(),
            None => text,
        },
        Err(err) => {
            log::error!("CSV serialization failed: {err}");
            String::new()
        }
    }
}

fn write_records(headers: &[String], data: &Dataset) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;

    for record in data {
        let row: Vec<String> = headers
            .iter()
            .map(|header| {
                record
                    .get(header)
                    .map(data_model::display_value)
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn coerce_csv_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    if data_model::looks_numeric(raw) {
        if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(raw.to_string())
}
