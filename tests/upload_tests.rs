use serde_json::json;

use jsoncel::io::upload::{
    self, FileFormat, UploadError, UploadLimits, MAX_UPLOAD_BYTES,
};
use jsoncel::state::columns::ColumnKind;
use jsoncel::state::data_model::Record;

#[test]
fn test_detect_format_by_extension() {
    assert_eq!(upload::detect_format("data.json"), Some(FileFormat::Json));
    assert_eq!(upload::detect_format("data.JSON"), Some(FileFormat::Json));
    assert_eq!(upload::detect_format("notes.txt"), Some(FileFormat::Json));
    assert_eq!(upload::detect_format("table.csv"), Some(FileFormat::Csv));
    assert_eq!(upload::detect_format("sheet.xlsx"), None);
    assert_eq!(upload::detect_format("archive.zip"), None);
}

#[test]
fn test_validate_upload_accepts_small_json() {
    let format = upload::validate_upload("data.json", 1_024, UploadLimits::default()).unwrap();
    assert_eq!(format, FileFormat::Json);
}

#[test]
fn test_validate_upload_size_gate() {
    let err =
        upload::validate_upload("data.json", MAX_UPLOAD_BYTES + 1, UploadLimits::default())
            .unwrap_err();
    assert!(matches!(err, UploadError::TooLarge { .. }));

    // Exactly at the limit passes.
    assert!(upload::validate_upload("data.json", MAX_UPLOAD_BYTES, UploadLimits::default()).is_ok());
}

#[test]
fn test_validate_upload_custom_limit() {
    let limits = UploadLimits { max_bytes: 10 };
    let err = upload::validate_upload("data.json", 11, limits).unwrap_err();
    assert!(matches!(err, UploadError::TooLarge { size: 11, limit: 10 }));
}

#[test]
fn test_validate_upload_rejects_bad_filenames() {
    for name in ["", "../../etc/passwd.json", "a<b.json", "x|y.csv"] {
        let err = upload::validate_upload(name, 10, UploadLimits::default()).unwrap_err();
        assert!(matches!(err, UploadError::InvalidFilename), "{name}");
    }

    let long = format!("{}.json", "a".repeat(300));
    let err = upload::validate_upload(&long, 10, UploadLimits::default()).unwrap_err();
    assert!(matches!(err, UploadError::InvalidFilename));
}

#[test]
fn test_validate_upload_rejects_unknown_extension() {
    let err = upload::validate_upload("sheet.xlsx", 10, UploadLimits::default()).unwrap_err();
    assert!(matches!(err, UploadError::UnsupportedExtension(ext) if ext == "xlsx"));
}

#[test]
fn test_import_text_json() {
    let data = upload::import_text("data.json", r#"[{"a":1}]"#).unwrap();
    assert_eq!(data[0]["a"], json!(1));
}

#[test]
fn test_import_text_csv() {
    let data = upload::import_text("data.csv", "a,b\n1,x\n").unwrap();
    assert_eq!(data[0]["a"], json!(1));
    assert_eq!(data[0]["b"], json!("x"));
}

#[test]
fn test_import_text_surfaces_parse_errors() {
    let err = upload::import_text("data.json", "{broken").unwrap_err();
    assert!(matches!(err, UploadError::Json(_)));
}

#[test]
fn test_export_stats() {
    let data = vec![
        json!({"name": "Alice", "age": 30, "joined": "2024-01-15"}),
        json!({"name": "Bob", "age": 25, "joined": "2024-02-20"}),
    ]
    .into_iter()
    .map(|v| v.as_object().cloned().unwrap())
    .collect::<Vec<Record>>();

    let stats = upload::export_stats(&data);
    assert_eq!(stats.total_rows, 2);
    assert_eq!(stats.total_columns, 3);
    assert_eq!(stats.column_names, vec!["name", "age", "joined"]);
    assert!(stats
        .column_kinds
        .contains(&("age".to_string(), ColumnKind::Number)));
    assert!(stats
        .column_kinds
        .contains(&("joined".to_string(), ColumnKind::Date)));
}

#[test]
fn test_file_format_extensions() {
    assert_eq!(FileFormat::Json.extension(), "json");
    assert_eq!(FileFormat::Csv.extension(), "csv");
    assert_eq!(FileFormat::Xlsx.extension(), "xls");
}
