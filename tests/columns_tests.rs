use serde_json::{json, Value};

use jsoncel::state::columns::{self, Column, ColumnKind};
use jsoncel::state::data_model::{Dataset, Record};

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_build_columns_first_seen_order() {
    let data = vec![
        record(json!({"name": "Alice", "age": 30})),
        record(json!({"age": 25, "city": "Oslo"})),
    ];
    let cols = columns::build_columns(&data);
    let ids: Vec<&str> = cols.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["name", "age", "city"]);
}

#[test]
fn test_detect_kind_from_first_non_null() {
    let data = vec![
        record(json!({"n": null, "b": null})),
        record(json!({"n": 5, "b": true})),
    ];
    assert_eq!(columns::detect_column_kind(&data, "n"), ColumnKind::Number);
    assert_eq!(columns::detect_column_kind(&data, "b"), ColumnKind::Boolean);
}

#[test]
fn test_mixed_column_keeps_first_seen_kind() {
    let data = vec![record(json!({"x": 1})), record(json!({"x": "two"}))];
    assert_eq!(columns::detect_column_kind(&data, "x"), ColumnKind::Number);
}

#[test]
fn test_date_kind_requires_all_strings_to_look_like_dates() {
    let dates = vec![
        record(json!({"d": "2024-01-15"})),
        record(json!({"d": "2024-02-20"})),
    ];
    assert_eq!(columns::detect_column_kind(&dates, "d"), ColumnKind::Date);

    let mixed = vec![
        record(json!({"d": "2024-01-15"})),
        record(json!({"d": "not a date"})),
    ];
    assert_eq!(columns::detect_column_kind(&mixed, "d"), ColumnKind::Text);
}

#[test]
fn test_numeric_string_column_stays_text() {
    let data = vec![record(json!({"zip": "12345"})), record(json!({"zip": "67890"}))];
    assert_eq!(columns::detect_column_kind(&data, "zip"), ColumnKind::Text);
}

#[test]
fn test_missing_key_defaults_to_text() {
    let data = vec![record(json!({"a": 1}))];
    assert_eq!(
        columns::detect_column_kind(&data, "missing"),
        ColumnKind::Text
    );
}

#[test]
fn test_looks_like_iso_date() {
    assert!(columns::looks_like_iso_date("2024-01-15"));
    assert!(columns::looks_like_iso_date("2024-01-15T10:30:00Z"));
    assert!(!columns::looks_like_iso_date("2024-1-15"));
    assert!(!columns::looks_like_iso_date("15-01-2024x"));
    assert!(!columns::looks_like_iso_date("hello"));
}

#[test]
fn test_virtual_column_identity() {
    let col = Column::virtual_at(3);
    assert_eq!(col.id, "virtual_col_3");
    assert_eq!(col.title, "Column 4");
    assert!(col.is_virtual());
    assert!(!Column::new("name", ColumnKind::Text).is_virtual());
}

#[test]
fn test_cell_at_virtual_and_out_of_range() {
    let data = vec![record(json!({"a": "x"}))];
    let cols = vec![
        Column::new("a", ColumnKind::Text),
        Column::virtual_at(1),
    ];
    assert_eq!(columns::cell_at(&data, &cols, 0, 0), json!("x"));
    assert_eq!(columns::cell_at(&data, &cols, 0, 1), Value::Null);
    assert_eq!(columns::cell_at(&data, &cols, 5, 0), Value::Null);
    assert_eq!(columns::cell_at(&data, &cols, 0, 9), Value::Null);
}

#[test]
fn test_build_columns_empty_dataset() {
    assert!(columns::build_columns(&Dataset::new()).is_empty());
}
