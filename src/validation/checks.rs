//! The four validation rules.
//!
//! Every rule only touches columns that are actually present in the table, so a missing
//! column is reported once (by the columns check) and never panics a later rule.

use crate::registry::SheetConfig;
use crate::types::{Table, TypeTag, Value};

use super::coerce::{coerce, Coerced};
use super::report::{format_rows_by_column, CheckKind, CheckResult, ErrorLocation, ErrorMap};

/// Required columns absent from the table, in `required_cols` order.
pub(crate) fn missing_columns(table: &Table, sheet: &SheetConfig) -> Vec<&'static str> {
    sheet
        .required_cols
        .iter()
        .copied()
        .filter(|col| !table.has_column(col))
        .collect()
}

pub(crate) fn column_presence(table: &Table, sheet: &SheetConfig) -> CheckResult {
    let missing = missing_columns(table, sheet);
    if missing.is_empty() {
        CheckResult::pass(
            CheckKind::Columns,
            format!("All required columns present in sheet '{}'", sheet.label()),
        )
    } else {
        CheckResult::fail(
            CheckKind::Columns,
            format!("Missing column(s) from sheet '{}': {}", sheet.label(), missing.join(", ")),
        )
    }
}

/// Rewrite every configured column into its declared type.
///
/// Cells that cannot be coerced become [`Value::Null`] and are recorded in `errors`. In
/// `datetime` and `float` columns an empty cell is a type error too; `string` columns
/// leave empty cells to the missing-values check.
pub(crate) fn type_coercion(table: &mut Table, sheet: &SheetConfig, errors: &mut ErrorMap) -> CheckResult {
    let mut invalid: Vec<(&str, Vec<usize>)> = Vec::new();

    for &(name, tag) in sheet.columns {
        let Some(idx) = table.index_of(name) else {
            continue;
        };
        let mut bad_rows = Vec::new();
        for (row_idx, row) in table.rows.iter_mut().enumerate() {
            match coerce(&row[idx], tag) {
                Coerced::Ok(v) => row[idx] = v,
                Coerced::Empty if tag == TypeTag::String => row[idx] = Value::Null,
                Coerced::Empty | Coerced::Invalid => {
                    row[idx] = Value::Null;
                    errors.insert(ErrorLocation::new(row_idx, name));
                    bad_rows.push(row_idx);
                }
            }
        }
        if !bad_rows.is_empty() {
            invalid.push((name, bad_rows));
        }
    }

    if invalid.is_empty() {
        CheckResult::pass(CheckKind::DataTypes, "All data types valid")
    } else {
        CheckResult::fail(
            CheckKind::DataTypes,
            format!("Invalid data types in: {}", format_rows_by_column(&invalid)),
        )
    }
}

/// Flag empty cells in present required columns, including nulls left by coercion.
pub(crate) fn missing_values(table: &Table, sheet: &SheetConfig, errors: &mut ErrorMap) -> CheckResult {
    let mut missing: Vec<(&str, Vec<usize>)> = Vec::new();

    for &name in sheet.required_cols {
        let Some(idx) = table.index_of(name) else {
            continue;
        };
        let rows: Vec<usize> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row[idx].is_null())
            .map(|(row_idx, _)| row_idx)
            .collect();
        if !rows.is_empty() {
            errors.extend(rows.iter().map(|&r| ErrorLocation::new(r, name)));
            missing.push((name, rows));
        }
    }

    if missing.is_empty() {
        CheckResult::pass(CheckKind::MissingValues, "No missing values in required columns")
    } else {
        CheckResult::fail(
            CheckKind::MissingValues,
            format!("Missing values in: {}", format_rows_by_column(&missing)),
        )
    }
}

/// Require the numeric columns of each row to sum to a strictly positive value.
///
/// A null numeric cell poisons its row's sum: the row fails regardless of the other
/// columns. Every numeric column of a failing row is recorded, not only the offending one.
pub(crate) fn checksum(table: &Table, sheet: &SheetConfig, errors: &mut ErrorMap) -> CheckResult {
    let present: Vec<(&str, usize)> = sheet
        .numeric_cols
        .iter()
        .filter_map(|&name| table.index_of(name).map(|idx| (name, idx)))
        .collect();

    if present.is_empty() {
        return CheckResult::fail(
            CheckKind::Checksum,
            format!(
                "Cannot compute checksums: numeric column(s) missing: {}",
                sheet.numeric_cols.join(", ")
            ),
        );
    }

    let mut failing = 0usize;
    for (row_idx, row) in table.rows.iter().enumerate() {
        if row_sum(row, &present).is_some_and(|sum| sum > 0.0) {
            continue;
        }
        failing += 1;
        errors.extend(present.iter().map(|&(name, _)| ErrorLocation::new(row_idx, name)));
    }

    if failing == 0 {
        CheckResult::pass(CheckKind::Checksum, "All checksums valid")
    } else {
        CheckResult::fail(CheckKind::Checksum, format!("Invalid checksums in {failing} row(s)"))
    }
}

fn row_sum(row: &[Value], cols: &[(&str, usize)]) -> Option<f64> {
    cols.iter().try_fold(0.0, |acc, &(_, idx)| match row[idx] {
        Value::Float64(v) => Some(acc + v),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{checksum, column_presence, missing_values, type_coercion};
    use crate::registry::{SheetConfig, SheetSelector};
    use crate::types::{Table, TypeTag, Value};
    use crate::validation::report::ErrorMap;

    const TWO_NUMERIC: SheetConfig = SheetConfig {
        sheet: SheetSelector::Name("Flows"),
        table_name: "flows",
        columns: &[
            ("label", TypeTag::String),
            ("inflow", TypeTag::Float),
            ("outflow", TypeTag::Float),
        ],
        required_cols: &["label", "inflow", "outflow"],
        numeric_cols: &["inflow", "outflow"],
    };

    fn locations(errors: &ErrorMap) -> Vec<(usize, &str)> {
        errors.iter().map(|l| (l.row, l.column.as_str())).collect()
    }

    #[test]
    fn presence_names_missing_columns_in_config_order() {
        let table = Table::new(["inflow"], vec![]);
        let result = column_presence(&table, &TWO_NUMERIC);
        assert!(!result.passed);
        assert_eq!(result.message, "Missing column(s) from sheet 'Flows': label, outflow");
    }

    #[test]
    fn coercion_nulls_only_bad_cells() {
        let mut table = Table::new(
            ["label", "inflow", "outflow"],
            vec![
                vec![Value::from("a"), Value::from("1.5"), Value::from("x")],
                vec![Value::Int64(3), Value::from("2"), Value::from("0.5")],
            ],
        );
        let mut errors = ErrorMap::new();
        let result = type_coercion(&mut table, &TWO_NUMERIC, &mut errors);

        assert!(!result.passed);
        assert_eq!(result.message, "Invalid data types in: outflow: [0]");
        assert_eq!(locations(&errors), vec![(0, "outflow")]);
        assert_eq!(table.rows[0], vec![Value::from("a"), Value::Float64(1.5), Value::Null]);
        assert_eq!(table.rows[1], vec![Value::from("3"), Value::Float64(2.0), Value::Float64(0.5)]);
    }

    #[test]
    fn empty_typed_cells_are_type_errors() {
        let mut table = Table::new(
            ["label", "inflow", "outflow"],
            vec![
                vec![Value::from("a"), Value::Null, Value::from("1")],
                vec![Value::from("b"), Value::from("2"), Value::from(" ")],
            ],
        );
        let mut errors = ErrorMap::new();
        let result = type_coercion(&mut table, &TWO_NUMERIC, &mut errors);

        assert!(!result.passed);
        assert_eq!(result.message, "Invalid data types in: inflow: [0]; outflow: [1]");
        assert_eq!(locations(&errors), vec![(0, "inflow"), (1, "outflow")]);
        assert_eq!(table.rows[1][2], Value::Null);
    }

    #[test]
    fn empty_string_cells_are_missing_not_type_errors() {
        let mut table = Table::new(
            ["label", "inflow", "outflow"],
            vec![vec![Value::Null, Value::from("1"), Value::from("1")]],
        );
        let mut errors = ErrorMap::new();
        assert!(type_coercion(&mut table, &TWO_NUMERIC, &mut errors).passed);
        assert!(errors.is_empty());

        let result = missing_values(&table, &TWO_NUMERIC, &mut errors);
        assert_eq!(result.message, "Missing values in: label: [0]");
        assert_eq!(locations(&errors), vec![(0, "label")]);
    }

    #[test]
    fn checksum_flags_every_numeric_column_of_failing_rows() {
        let table = Table::new(
            ["label", "inflow", "outflow"],
            vec![
                vec![Value::from("ok"), Value::Float64(5.0), Value::Float64(-1.0)],
                vec![Value::from("zero"), Value::Float64(2.0), Value::Float64(-2.0)],
                vec![Value::from("null"), Value::Float64(9.0), Value::Null],
            ],
        );
        let mut errors = ErrorMap::new();
        let result = checksum(&table, &TWO_NUMERIC, &mut errors);

        assert!(!result.passed);
        assert_eq!(result.message, "Invalid checksums in 2 row(s)");
        assert_eq!(
            locations(&errors),
            vec![(1, "inflow"), (1, "outflow"), (2, "inflow"), (2, "outflow")]
        );
    }

    #[test]
    fn checksum_sums_only_present_numeric_columns() {
        let table = Table::new(["label", "inflow"], vec![vec![Value::from("a"), Value::Float64(1.0)]]);
        let mut errors = ErrorMap::new();
        assert!(checksum(&table, &TWO_NUMERIC, &mut errors).passed);

        let table = Table::new(["label"], vec![vec![Value::from("a")]]);
        let result = checksum(&table, &TWO_NUMERIC, &mut errors);
        assert!(!result.passed);
        assert!(result.message.contains("numeric column(s) missing: inflow, outflow"));
        assert!(errors.is_empty());
    }
}
