#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;

use sheet_import::ingestion::excel::{read_sheet_from_path, read_sheets_from_path};
use sheet_import::ingestion::IngestionOptions;
use sheet_import::pipeline::prepare_import;
use sheet_import::registry::SheetSelector;
use sheet_import::types::Value;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sheet-import-{name}-{nanos}.xlsx"))
}

/// Two-tab P&L workbook. `KPIs` starts one row down and has a blank row between records.
fn write_pnl_xlsx(path: &PathBuf, kpi_value: f64) {
    use rust_xlsxwriter::{Format, Workbook};

    let date_fmt = Format::new().set_num_format("yyyy-mm-dd");
    let mut wb = Workbook::new();

    let actuals = wb.add_worksheet();
    actuals.set_name("Actuals").unwrap();
    actuals.write_string(0, 0, "date").unwrap();
    actuals.write_string(0, 1, "account").unwrap();
    actuals.write_string(0, 2, "profit_loss").unwrap();
    // 45322 is 2024-01-31 in the 1900 date system.
    actuals.write_number_with_format(1, 0, 45322, &date_fmt).unwrap();
    actuals.write_string(1, 1, "Sales").unwrap();
    actuals.write_number(1, 2, 1200).unwrap();
    actuals.write_string(2, 0, "2024-02-29").unwrap();
    actuals.write_string(2, 1, "Services").unwrap();
    actuals.write_number(2, 2, 310.5).unwrap();

    let kpis = wb.add_worksheet();
    kpis.set_name("KPIs").unwrap();
    kpis.write_string(1, 0, "date").unwrap();
    kpis.write_string(1, 1, "kpi_type").unwrap();
    kpis.write_string(1, 2, "kpi_name").unwrap();
    kpis.write_string(1, 3, "kpi_value").unwrap();
    kpis.write_string(2, 0, "2024-01-31").unwrap();
    kpis.write_string(2, 1, "margin").unwrap();
    kpis.write_string(2, 2, "gross").unwrap();
    kpis.write_number(2, 3, kpi_value).unwrap();
    kpis.write_string(4, 0, "2024-02-29").unwrap();
    kpis.write_string(4, 1, "margin").unwrap();
    kpis.write_string(4, 2, "net").unwrap();
    kpis.write_number(4, 3, 0.18).unwrap();

    wb.save(path).unwrap();
}

#[test]
fn read_sheets_follows_selector_order() {
    let path = tmp_file("pnl-order");
    write_pnl_xlsx(&path, 0.42);

    let tables = read_sheets_from_path(
        &path,
        &[SheetSelector::Name("KPIs"), SheetSelector::Name("Actuals")],
    )
    .unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].columns, vec!["date", "kpi_type", "kpi_name", "kpi_value"]);
    // Header is the first non-empty row; blank rows are skipped.
    assert_eq!(tables[0].row_count(), 2);
    assert_eq!(tables[0].rows[1][2], Value::from("net"));
    assert_eq!(tables[1].columns, vec!["date", "account", "profit_loss"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn date_formatted_cells_load_as_datetimes() {
    let path = tmp_file("pnl-dates");
    write_pnl_xlsx(&path, 0.42);

    let table = read_sheet_from_path(&path, SheetSelector::Index(0)).unwrap();
    let jan = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(table.rows[0][0], Value::DateTime(jan));
    assert_eq!(table.rows[0][2], Value::Float64(1200.0));
    assert_eq!(table.rows[1][0], Value::from("2024-02-29"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_worksheet_is_invalid_input() {
    let path = tmp_file("pnl-missing");
    write_pnl_xlsx(&path, 0.42);

    let err = read_sheet_from_path(&path, SheetSelector::Name("Budget")).unwrap_err();
    assert!(err.to_string().contains("worksheet Budget not found"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn blank_header_cells_get_positional_names() {
    use rust_xlsxwriter::Workbook;

    let path = tmp_file("unnamed");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "date").unwrap();
    ws.write_string(0, 2, "value").unwrap();
    ws.write_string(1, 0, "2024-01-01").unwrap();
    ws.write_string(1, 1, "orphan").unwrap();
    ws.write_number(1, 2, 5).unwrap();
    wb.save(&path).unwrap();

    let table = read_sheet_from_path(&path, SheetSelector::Index(0)).unwrap();
    assert_eq!(table.columns, vec!["date", "Unnamed: 1", "value"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn prepare_import_validates_every_pnl_sheet() {
    let path = tmp_file("pnl-valid");
    write_pnl_xlsx(&path, 0.42);

    let validation = prepare_import(&path, "P&L", &IngestionOptions::default()).unwrap();
    assert!(validation.is_valid(), "{}", validation.summary());
    assert_eq!(validation.sheets.len(), 2);
    assert_eq!(validation.row_count(), 4);
    assert!(validation.summary().ends_with("All Validations Passed!\n"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn prepare_import_flags_failing_kpi_sheet_only() {
    let path = tmp_file("pnl-invalid");
    write_pnl_xlsx(&path, -1.0);

    let validation = prepare_import(&path, "P&L", &IngestionOptions::default()).unwrap();
    assert!(validation.sheets[0].is_valid());
    assert!(!validation.sheets[1].is_valid());
    assert_eq!(validation.failure_messages(), vec!["Invalid checksums in 1 row(s)".to_string()]);

    let cells: Vec<(usize, &str)> = validation.sheets[1]
        .errors
        .iter()
        .map(|l| (l.row, l.column.as_str()))
        .collect();
    assert_eq!(cells, vec![(0, "kpi_value")]);

    let _ = std::fs::remove_file(&path);
}
