use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sheet_import::ingestion::{load_dataset_from_path, IngestionFormat, IngestionOptions};
use sheet_import::registry::get_config;
use sheet_import::types::Value;
use sheet_import::ImportError;

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sheet-import-unified-{nanos}.{ext}"))
}

#[test]
fn format_is_inferred_from_extension() {
    let dataset = get_config("Valuations").unwrap();
    let opts = IngestionOptions::default();

    let from_csv = load_dataset_from_path("tests/fixtures/valuations.csv", dataset, &opts).unwrap();
    let from_json = load_dataset_from_path("tests/fixtures/valuations.json", dataset, &opts).unwrap();

    assert_eq!(from_csv.len(), 1);
    assert_eq!(from_json.len(), 1);
    assert_eq!(from_csv[0].columns, from_json[0].columns);
    assert_eq!(from_csv[0].row_count(), from_json[0].row_count());
}

#[test]
fn forced_format_overrides_the_extension() {
    let path = tmp_file("txt");
    std::fs::write(&path, "date,asset,value\n2024-01-01,AAPL,3\n").unwrap();

    let dataset = get_config("Valuations").unwrap();
    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    };
    let tables = load_dataset_from_path(&path, dataset, &opts).unwrap();
    assert_eq!(tables[0].rows[0][2], Value::from("3"));

    let err = load_dataset_from_path(&path, dataset, &IngestionOptions::default()).unwrap_err();
    assert!(err.to_string().contains("cannot infer format from extension 'txt'"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn multi_sheet_dataset_needs_a_workbook() {
    let dataset = get_config("P&L").unwrap();
    let err =
        load_dataset_from_path("tests/fixtures/valuations.json", dataset, &IngestionOptions::default()).unwrap_err();

    match err {
        ImportError::InvalidInput { message } => assert!(message.contains("upload a workbook")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}
