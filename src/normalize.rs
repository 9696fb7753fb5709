//! Wide-to-long schema normalization and missing-value handling.
//!
//! The normalizer turns a dataset-specific wide table (one column per
//! reporting year) into the canonical long schema shared by the repository
//! and the analysis helpers:
//!
//! `country_code, country_name, indicator_code, indicator_name, report_date, value`
//!
//! Yearly observations are normalized to January 1 (`YYYY-01-01`) report
//! dates. Cells that fail numeric coercion, including empty strings, become
//! missing values rather than errors.

use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    table::{ColumnType, DataTable, Row, Value, coerce_cell},
};

/// Canonical long-format column order.
pub const REPORT_COLUMNS: [&str; 6] = [
    "country_code",
    "country_name",
    "indicator_code",
    "indicator_name",
    "report_date",
    "value",
];

/// Source-to-canonical renames for the World Bank identifier columns, in
/// canonical output order.
const IDENTIFIER_COLUMNS: [(&str, &str); 4] = [
    ("Country Code", "country_code"),
    ("Country Name", "country_name"),
    ("Indicator Code", "indicator_code"),
    ("Indicator Name", "indicator_name"),
];

/// Closed set of dataset layouts the normalizer understands. Adding a source
/// means adding a variant and its reshape arm, not a conditional sprawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    WorldBank,
}

impl FromStr for DatasetKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "world_bank" | "world-bank" => Ok(DatasetKind::WorldBank),
            other => Err(Error::UnsupportedDataset(other.to_string())),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::WorldBank => write!(f, "world_bank"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingStrategy {
    /// Remove every row containing at least one missing field.
    Drop,
    /// Replace every missing field with numeric zero.
    FillZero,
}

impl FromStr for MissingStrategy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "drop" => Ok(MissingStrategy::Drop),
            "fill_zero" | "fill-zero" => Ok(MissingStrategy::FillZero),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingStrategy::Drop => write!(f, "drop"),
            MissingStrategy::FillZero => write!(f, "fill_zero"),
        }
    }
}

/// Reshapes `table` into the canonical long schema for `dataset`.
///
/// Output row count is `identifier rows x year columns`. Fails with
/// [`Error::MissingColumn`] when an identifier column is absent.
pub fn normalize_schema(table: &DataTable, dataset: DatasetKind) -> Result<DataTable> {
    match dataset {
        DatasetKind::WorldBank => normalize_world_bank(table),
    }
}

fn normalize_world_bank(table: &DataTable) -> Result<DataTable> {
    let identifier_indices = IDENTIFIER_COLUMNS
        .iter()
        .map(|(source, _)| table.require_column(source))
        .collect::<Result<Vec<_>>>()?;

    let year_columns = table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, name)| is_year_column(name))
        .map(|(idx, name)| (idx, name.clone()))
        .collect::<Vec<_>>();

    let mut long = DataTable::new(REPORT_COLUMNS);
    for row in table.rows() {
        for (year_idx, year) in &year_columns {
            let mut out: Row = identifier_indices
                .iter()
                .map(|&idx| row.get(idx).cloned().flatten())
                .collect();
            out.push(Some(Value::String(format!("{year}-01-01"))));
            out.push(row.get(*year_idx).cloned().flatten());
            long.push_row(out);
        }
    }

    convert_types(&long, &[("value", ColumnType::Float)])
}

fn is_year_column(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}

/// Applies `strategy` to every missing field across all columns.
pub fn handle_missing(table: &DataTable, strategy: MissingStrategy) -> DataTable {
    let mut cleaned = DataTable::new(table.headers().to_vec());
    for row in table.rows() {
        match strategy {
            MissingStrategy::Drop => {
                if row.iter().all(|cell| cell.is_some()) {
                    cleaned.push_row(row.clone());
                }
            }
            MissingStrategy::FillZero => {
                let filled = row
                    .iter()
                    .map(|cell| cell.clone().or(Some(Value::Float(0.0))))
                    .collect();
                cleaned.push_row(filled);
            }
        }
    }
    cleaned
}

/// Coerces each mapped column to its target type; unmapped columns (notably
/// date columns) stay as text. Cells that fail coercion become missing.
pub fn convert_types(table: &DataTable, type_map: &[(&str, ColumnType)]) -> Result<DataTable> {
    let targets = type_map
        .iter()
        .map(|(name, ty)| table.require_column(name).map(|idx| (idx, *ty)))
        .collect::<Result<Vec<_>>>()?;

    let mut converted = DataTable::new(table.headers().to_vec());
    for row in table.rows() {
        let mut out = row.clone();
        for (idx, ty) in &targets {
            out[*idx] = coerce_cell(row[*idx].as_ref(), *ty);
        }
        converted.push_row(out);
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_sample() -> DataTable {
        let mut table = DataTable::new([
            "Country Name",
            "Country Code",
            "Indicator Name",
            "Indicator Code",
            "1960",
            "1961",
            "1962",
        ]);
        table.push_row(vec![
            Some(Value::String("Aruba".into())),
            Some(Value::String("ABW".into())),
            Some(Value::String("Life expectancy at birth".into())),
            Some(Value::String("SP.DYN.LE00.IN".into())),
            Some(Value::String("64.049".into())),
            Some(Value::String("64.215".into())),
            None,
        ]);
        table
    }

    #[test]
    fn dataset_kind_rejects_unknown_tags() {
        assert_eq!("world_bank".parse::<DatasetKind>().unwrap(), DatasetKind::WorldBank);
        assert!(matches!(
            "eurostat".parse::<DatasetKind>(),
            Err(Error::UnsupportedDataset(tag)) if tag == "eurostat"
        ));
    }

    #[test]
    fn missing_strategy_rejects_unknown_names() {
        assert_eq!("fill_zero".parse::<MissingStrategy>().unwrap(), MissingStrategy::FillZero);
        assert!(matches!(
            "interpolate".parse::<MissingStrategy>(),
            Err(Error::UnknownStrategy(name)) if name == "interpolate"
        ));
    }

    #[test]
    fn normalize_reshapes_each_year_column_into_one_row() {
        let long = normalize_schema(&wide_sample(), DatasetKind::WorldBank).expect("normalize");

        assert_eq!(long.headers(), &REPORT_COLUMNS);
        assert_eq!(long.row_count(), 3);

        assert_eq!(long.cell(0, 0), Some(&Value::String("ABW".into())));
        assert_eq!(long.cell(0, 4), Some(&Value::String("1960-01-01".into())));
        assert_eq!(long.cell(0, 5), Some(&Value::Float(64.049)));
        assert_eq!(long.cell(1, 4), Some(&Value::String("1961-01-01".into())));
        // The empty 1962 cell coerces to missing, not an error.
        assert_eq!(long.cell(2, 5), None);
    }

    #[test]
    fn normalize_emits_rows_times_years() {
        let mut table = DataTable::new([
            "Country Name",
            "Country Code",
            "Indicator Name",
            "Indicator Code",
            "2000",
            "2001",
            "2002",
            "2003",
        ]);
        for code in ["ABW", "AFG"] {
            table.push_row(vec![
                Some(Value::String(format!("{code} name"))),
                Some(Value::String(code.into())),
                Some(Value::String("Indicator".into())),
                Some(Value::String("IND.CODE".into())),
                Some(Value::String("1".into())),
                Some(Value::String("2".into())),
                Some(Value::String("3".into())),
                Some(Value::String("4".into())),
            ]);
        }

        let long = normalize_schema(&table, DatasetKind::WorldBank).expect("normalize");
        assert_eq!(long.row_count(), 2 * 4);
        for row in 0..long.row_count() {
            let date = long.cell(row, 4).and_then(|v| v.as_str()).expect("date");
            assert!(date.ends_with("-01-01"), "unexpected date {date}");
        }
    }

    #[test]
    fn normalize_requires_identifier_columns() {
        let table = DataTable::new(["Country Name", "Indicator Name", "1999"]);
        assert!(matches!(
            normalize_schema(&table, DatasetKind::WorldBank),
            Err(Error::MissingColumn(name)) if name == "Country Code"
        ));
    }

    #[test]
    fn drop_removes_rows_with_any_missing_field() {
        let long = normalize_schema(&wide_sample(), DatasetKind::WorldBank).expect("normalize");
        let cleaned = handle_missing(&long, MissingStrategy::Drop);
        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(cleaned.cell(1, 4), Some(&Value::String("1961-01-01".into())));
    }

    #[test]
    fn fill_zero_preserves_row_count_and_fills_missing_values() {
        let long = normalize_schema(&wide_sample(), DatasetKind::WorldBank).expect("normalize");
        let filled = handle_missing(&long, MissingStrategy::FillZero);
        assert_eq!(filled.row_count(), 3);
        assert_eq!(filled.cell(2, 5), Some(&Value::Float(0.0)));
    }

    #[test]
    fn convert_types_coerces_mapped_columns_only() {
        let mut table = DataTable::new(["report_date", "value"]);
        table.push_row(vec![
            Some(Value::String("2020-01-01".into())),
            Some(Value::String("12.5".into())),
        ]);
        table.push_row(vec![
            Some(Value::String("2021-01-01".into())),
            Some(Value::String("not a number".into())),
        ]);

        let converted = convert_types(&table, &[("value", ColumnType::Float)]).expect("convert");
        assert_eq!(converted.cell(0, 0), Some(&Value::String("2020-01-01".into())));
        assert_eq!(converted.cell(0, 1), Some(&Value::Float(12.5)));
        assert_eq!(converted.cell(1, 1), None);

        assert!(matches!(
            convert_types(&table, &[("absent", ColumnType::Float)]),
            Err(Error::MissingColumn(_))
        ));
    }
}
