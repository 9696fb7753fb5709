use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    chart::ChartKind,
    error::Error,
    filter::FilterCriteria,
    normalize::{DatasetKind, MissingStrategy},
    repository,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Import and analyze World Bank health indicator data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a wide-format indicator CSV into the report database
    Import(ImportArgs),
    /// List stored reports, optionally filtered by country and date range
    Query(QueryArgs),
    /// Summary statistics over the filtered report values
    Stats(StatsArgs),
    /// Mean value per report date over time, oldest first
    Trend(TrendArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Input CSV file in World Bank WDI layout
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// SQLite database file to import into
    #[arg(short = 'd', long = "db", default_value = repository::DEFAULT_DB_PATH)]
    pub db: PathBuf,
    /// Dataset layout of the source file (currently only world_bank)
    #[arg(long, default_value = "world_bank", value_parser = parse_dataset)]
    pub dataset: DatasetKind,
    /// Missing-value strategy applied before saving (drop, fill_zero)
    #[arg(long, default_value = "drop", value_parser = parse_strategy)]
    pub missing: MissingStrategy,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Country code to filter by, e.g. ABW
    #[arg(short = 'c', long)]
    pub country: Option<String>,
    /// Earliest report date, YYYY-MM-DD inclusive
    #[arg(long = "date-from", value_parser = parse_iso_date)]
    pub date_from: Option<String>,
    /// Latest report date, YYYY-MM-DD inclusive
    #[arg(long = "date-to", value_parser = parse_iso_date)]
    pub date_to: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            self.country.clone(),
            self.date_from.clone(),
            self.date_to.clone(),
        )
    }
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// SQLite database file to query
    #[arg(short = 'd', long = "db", default_value = repository::DEFAULT_DB_PATH)]
    pub db: PathBuf,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Maximum rows to display (0 = all)
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// SQLite database file to query
    #[arg(short = 'd', long = "db", default_value = repository::DEFAULT_DB_PATH)]
    pub db: PathBuf,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Group means by these report columns instead of one overall summary
    #[arg(long = "by", value_delimiter = ',')]
    pub group_by: Vec<String>,
    /// Emit the result as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TrendArgs {
    /// SQLite database file to query
    #[arg(short = 'd', long = "db", default_value = repository::DEFAULT_DB_PATH)]
    pub db: PathBuf,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Emit a renderable chart object as JSON instead of a table
    #[arg(long = "chart", value_enum)]
    pub chart: Option<ChartKindArg>,
    /// Title carried on the chart object
    #[arg(long, default_value = "Trend Over Time")]
    pub title: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ChartKindArg {
    Line,
    Bar,
}

impl From<ChartKindArg> for ChartKind {
    fn from(kind: ChartKindArg) -> Self {
        match kind {
            ChartKindArg::Line => ChartKind::Line,
            ChartKindArg::Bar => ChartKind::Bar,
        }
    }
}

fn parse_dataset(value: &str) -> Result<DatasetKind, String> {
    value.parse().map_err(|err: Error| err.to_string())
}

fn parse_strategy(value: &str) -> Result<MissingStrategy, String> {
    value.parse().map_err(|err: Error| err.to_string())
}

fn parse_iso_date(value: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("'{value}' is not a YYYY-MM-DD date"))
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_iso_date_round_trips_and_rejects_garbage() {
        assert_eq!(parse_iso_date("2020-01-01").unwrap(), "2020-01-01");
        assert!(parse_iso_date("2020-13-01").is_err());
        assert!(parse_iso_date("January 2020").is_err());
    }

    #[test]
    fn parse_dataset_surfaces_unsupported_tag_message() {
        assert!(parse_dataset("world_bank").is_ok());
        let err = parse_dataset("eurostat").unwrap_err();
        assert!(err.contains("eurostat"));
    }

    #[test]
    fn parse_delimiter_accepts_named_and_literal_forms() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter("ab").is_err());
    }
}
