//! Renderable chart hand-off objects.
//!
//! Plot rendering itself lives outside this crate; what crosses the boundary
//! is a [`Chart`]: kind, title, axis labels, and the x/y point series pulled
//! from a table. The JSON form is what an external plotter consumes.

use serde::Serialize;

use crate::{
    error::Result,
    table::{DataTable, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

/// Extracts the `(x_column, y_column)` series from `table` in row order.
/// Missing x cells render as empty labels; missing y cells stay missing so
/// the renderer can show gaps.
pub fn build_chart(
    table: &DataTable,
    x_column: &str,
    y_column: &str,
    title: &str,
    kind: ChartKind,
) -> Result<Chart> {
    let x_idx = table.require_column(x_column)?;
    let y_idx = table.require_column(y_column)?;

    let points = table
        .rows()
        .iter()
        .map(|row| ChartPoint {
            x: row
                .get(x_idx)
                .and_then(|c| c.as_ref())
                .map(Value::as_display)
                .unwrap_or_default(),
            y: row.get(y_idx).and_then(|c| c.as_ref()).and_then(Value::as_f64),
        })
        .collect();

    Ok(Chart {
        kind,
        title: title.to_string(),
        x_label: x_column.to_string(),
        y_label: y_column.to_string(),
        points,
    })
}
