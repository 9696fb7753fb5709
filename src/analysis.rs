//! Summary statistics and grouped aggregates over the canonical schema.
//!
//! All aggregations treat missing cells as absent observations: `count`
//! counts only non-missing values and means ignore missing values entirely.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    table::{DataTable, Value},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Computes mean/min/max/count over the non-missing values of
/// `value_column`. Fails with [`Error::EmptyAggregate`] when the column
/// holds no non-missing values.
pub fn summary_stats(table: &DataTable, value_column: &str) -> Result<SummaryStats> {
    let idx = table.require_column(value_column)?;

    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for cell in table.column_cells(idx) {
        if let Some(value) = cell.and_then(Value::as_f64) {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }
    }

    if count == 0 {
        return Err(Error::EmptyAggregate(value_column.to_string()));
    }

    Ok(SummaryStats {
        mean: sum / count as f64,
        min,
        max,
        count,
    })
}

/// Mean of `value_column` per distinct `date_column` value, one row per
/// date, sorted ascending (lexicographic, which is chronological for ISO
/// dates). Rows with a missing date are skipped; a date whose values are all
/// missing keeps its row with a missing mean.
pub fn trend_over_time(
    table: &DataTable,
    date_column: &str,
    value_column: &str,
) -> Result<DataTable> {
    group_aggregate(table, &[date_column], value_column)
}

/// Mean of `agg_column` per distinct tuple of `group_columns`. Output rows
/// carry the group columns followed by the aggregate column, ordered by
/// group key. Rows missing any group cell are skipped.
pub fn group_aggregate(
    table: &DataTable,
    group_columns: &[&str],
    agg_column: &str,
) -> Result<DataTable> {
    let group_indices = group_columns
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;
    let agg_idx = table.require_column(agg_column)?;

    let mut groups: BTreeMap<Vec<String>, (f64, usize)> = BTreeMap::new();
    for row in table.rows() {
        let key = group_indices
            .iter()
            .map(|&idx| {
                row.get(idx)
                    .and_then(|cell| cell.as_ref())
                    .map(Value::as_display)
            })
            .collect::<Option<Vec<_>>>();
        let Some(key) = key else { continue };

        let entry = groups.entry(key).or_insert((0.0, 0));
        if let Some(value) = row.get(agg_idx).and_then(|c| c.as_ref()).and_then(Value::as_f64) {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let headers = group_columns
        .iter()
        .map(|name| name.to_string())
        .chain([agg_column.to_string()])
        .collect::<Vec<_>>();
    let mut aggregated = DataTable::new(headers);
    for (key, (sum, count)) in groups {
        let mut row = key
            .into_iter()
            .map(|text| Some(Value::String(text)))
            .collect::<Vec<_>>();
        let mean = (count > 0).then(|| Value::Float(sum / count as f64));
        row.push(mean);
        aggregated.push_row(row);
    }
    Ok(aggregated)
}
