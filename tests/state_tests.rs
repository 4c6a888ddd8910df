use serde_json::{json, Value};

use jsoncel::state::data_model::{self, Dataset, Record, ShapeError};

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn sample_data() -> Dataset {
    vec![
        record(json!({"name": "Alice", "age": 30, "active": true})),
        record(json!({"name": "Bob", "age": 25, "active": false})),
    ]
}

#[test]
fn test_dataset_from_array_of_objects() {
    let data = data_model::dataset_from_value(json!([{"a": 1}, {"a": 2}])).unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["a"], json!(1));
}

#[test]
fn test_dataset_from_single_object_wraps() {
    let data = data_model::dataset_from_value(json!({"key": "value"})).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["key"], json!("value"));
}

#[test]
fn test_dataset_from_scalar_wraps_as_value() {
    let data = data_model::dataset_from_value(json!(42)).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["value"], json!(42));
}

#[test]
fn test_dataset_from_mixed_array_rejected() {
    let err = data_model::dataset_from_value(json!([{"a": 1}, 2])).unwrap_err();
    assert_eq!(err, ShapeError::NotArrayOfObjects);
}

#[test]
fn test_dataset_from_empty_array() {
    let data = data_model::dataset_from_value(json!([])).unwrap();
    assert!(data.is_empty());
}

#[test]
fn test_key_union_first_seen_order() {
    let data = vec![
        record(json!({"b": 1, "a": 2})),
        record(json!({"c": 3, "a": 4})),
    ];
    assert_eq!(data_model::key_union(&data), vec!["b", "a", "c"]);
}

#[test]
fn test_display_value_variants() {
    assert_eq!(data_model::display_value(&json!("hello")), "hello");
    assert_eq!(data_model::display_value(&json!(42)), "42");
    assert_eq!(data_model::display_value(&json!(true)), "true");
    assert_eq!(data_model::display_value(&Value::Null), "");
    assert_eq!(data_model::display_value(&json!([1, 2])), "[1,2]");
    assert_eq!(
        data_model::display_value(&json!({"k": "v"})),
        r#"{"k":"v"}"#
    );
}

#[test]
fn test_set_cell_in_range() {
    let data = sample_data();
    let write = data_model::set_cell(&data, 1, "age", json!(26));
    assert_eq!(write.render[1]["age"], json!(26));
    assert_eq!(write.persisted.len(), 2);
    // Original untouched.
    assert_eq!(data[1]["age"], json!(25));
}

#[test]
fn test_set_cell_pads_virtual_rows() {
    let data = sample_data();
    let write = data_model::set_cell(&data, 5, "name", json!("Eve"));
    assert_eq!(write.render.len(), 6);
    assert_eq!(write.render[5]["name"], json!("Eve"));
    // Intermediate padding rows are empty and fall out of the persisted set.
    assert_eq!(write.persisted.len(), 3);
    assert_eq!(write.persisted[2]["name"], json!("Eve"));
}

#[test]
fn test_set_cell_then_value_at_round_trip() {
    let write = data_model::set_cell(&Dataset::new(), 0, "x", json!("y"));
    assert_eq!(data_model::value_at(&write.render, 0, "x"), json!("y"));
    assert_eq!(data_model::value_at(&write.render, 0, "missing"), Value::Null);
    assert_eq!(data_model::value_at(&write.render, 9, "x"), Value::Null);
}

#[test]
fn test_drop_empty_records() {
    let data = vec![
        record(json!({"a": ""})),
        record(json!({"a": "kept", "b": null})),
        record(json!({"a": null, "b": ""})),
    ];
    let filtered = data_model::drop_empty_records(&data);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["a"], json!("kept"));
}

#[test]
fn test_zero_and_false_are_not_empty() {
    let data = vec![record(json!({"a": 0})), record(json!({"b": false}))];
    assert_eq!(data_model::drop_empty_records(&data).len(), 2);
}

#[test]
fn test_add_and_remove_row() {
    let data = sample_data();
    let grown = data_model::add_row(&data);
    assert_eq!(grown.len(), 3);
    assert!(grown[2].is_empty());

    let shrunk = data_model::remove_row(&grown, 0);
    assert_eq!(shrunk.len(), 2);
    assert_eq!(shrunk[0]["name"], json!("Bob"));
}

#[test]
fn test_remove_row_out_of_range_is_noop() {
    let data = sample_data();
    assert_eq!(data_model::remove_row(&data, 99), data);
}

#[test]
fn test_add_column_to_every_record() {
    let data = sample_data();
    let next = data_model::add_column(&data, "city", json!(""));
    assert!(next.iter().all(|r| r.contains_key("city")));
}

#[test]
fn test_add_column_to_empty_dataset_creates_row() {
    let next = data_model::add_column(&Dataset::new(), "city", json!(""));
    assert_eq!(next.len(), 1);
    assert_eq!(next[0]["city"], json!(""));
}

#[test]
fn test_remove_column_preserves_key_order() {
    let data = vec![record(json!({"a": 1, "b": 2, "c": 3}))];
    let next = data_model::remove_column(&data, "b");
    let keys: Vec<&String> = next[0].keys().collect();
    assert_eq!(keys, vec!["a", "c"]);
}

#[test]
fn test_removed_row_does_not_resurrect_on_edit() {
    let data = sample_data();
    let shrunk = data_model::remove_row(&data, 1);
    let write = data_model::set_cell(&shrunk, 0, "age", json!(31));
    assert_eq!(write.persisted.len(), 1);
    assert!(write
        .persisted
        .iter()
        .all(|r| r["name"] != json!("Bob")));
}

#[test]
fn test_normalize_dataset_fills_missing_keys() {
    let data = vec![record(json!({"a": 1})), record(json!({"b": 2}))];
    let normalized = data_model::normalize_dataset(&data);
    assert_eq!(normalized[0]["b"], Value::Null);
    assert_eq!(normalized[1]["a"], Value::Null);
}

#[test]
fn test_parse_cell_input_integer() {
    assert_eq!(data_model::parse_cell_input("42"), json!(42));
    assert_eq!(data_model::parse_cell_input("-7"), json!(-7));
}

#[test]
fn test_parse_cell_input_float() {
    assert_eq!(data_model::parse_cell_input("3.25"), json!(3.25));
}

#[test]
fn test_parse_cell_input_boolean() {
    assert_eq!(data_model::parse_cell_input("true"), json!(true));
    assert_eq!(data_model::parse_cell_input("FALSE"), json!(false));
}

#[test]
fn test_parse_cell_input_plain_string() {
    assert_eq!(data_model::parse_cell_input("hello"), json!("hello"));
}

#[test]
fn test_parse_cell_input_empty_stays_empty_string() {
    assert_eq!(data_model::parse_cell_input(""), json!(""));
    assert_eq!(data_model::parse_cell_input("   "), json!(""));
}

#[test]
fn test_parse_cell_input_rust_float_words_stay_strings() {
    assert_eq!(data_model::parse_cell_input("inf"), json!("inf"));
    assert_eq!(data_model::parse_cell_input("NaN"), json!("NaN"));
}
