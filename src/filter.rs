//! Filter criteria over the canonical report schema.
//!
//! [`FilterCriteria`] is a value object with two interchangeable renderings:
//! a parameterized SQL predicate for the repository and an in-memory
//! predicate over a [`DataTable`]. Both select the same row set for the same
//! underlying rows; `report_date` bounds compare lexicographically, which is
//! equivalent to chronological order for ISO dates.

use crate::{
    error::Result,
    table::{DataTable, Value},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub country: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl FilterCriteria {
    pub fn new(
        country: Option<String>,
        date_from: Option<String>,
        date_to: Option<String>,
    ) -> Self {
        Self {
            country,
            date_from,
            date_to,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.date_from.is_none() && self.date_to.is_none()
    }

    /// Renders the criteria as a `WHERE` fragment with positional `?N`
    /// placeholders, conditions in fixed field order (country, date_from,
    /// date_to). Empty criteria yield an empty fragment and no parameters;
    /// the caller must treat that as select-all.
    pub fn to_query_predicate(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(country) = &self.country {
            params.push(country.clone());
            conditions.push(format!("country_code = ?{}", params.len()));
        }
        if let Some(date_from) = &self.date_from {
            params.push(date_from.clone());
            conditions.push(format!("report_date >= ?{}", params.len()));
        }
        if let Some(date_to) = &self.date_to {
            params.push(date_to.clone());
            conditions.push(format!("report_date <= ?{}", params.len()));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }

    /// Applies the same filter directly to an in-memory table. Rows whose
    /// filtered cell is missing are excluded, matching SQL comparison
    /// semantics against NULL.
    pub fn apply_in_memory(&self, table: &DataTable) -> Result<DataTable> {
        if self.is_empty() {
            return Ok(table.clone());
        }

        let country_idx = table.require_column("country_code")?;
        let date_idx = table.require_column("report_date")?;

        let mut filtered = DataTable::new(table.headers().to_vec());
        for row in table.rows() {
            let country = cell_text(row, country_idx);
            let date = cell_text(row, date_idx);

            if let Some(wanted) = &self.country {
                match &country {
                    Some(code) if code == wanted => {}
                    _ => continue,
                }
            }
            if let Some(from) = &self.date_from {
                match &date {
                    Some(d) if d.as_str() >= from.as_str() => {}
                    _ => continue,
                }
            }
            if let Some(to) = &self.date_to {
                match &date {
                    Some(d) if d.as_str() <= to.as_str() => {}
                    _ => continue,
                }
            }
            filtered.push_row(row.clone());
        }
        Ok(filtered)
    }
}

fn cell_text(row: &[Option<Value>], idx: usize) -> Option<String> {
    row.get(idx).and_then(|c| c.as_ref()).map(Value::as_display)
}
