//! Typed error surface for the import/query pipeline.
//!
//! Command modules wrap these in `anyhow` with call-site context; library
//! code returns them directly so callers can match on the failure kind.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Source file is missing, empty, or its header row cannot be parsed.
    #[error("cannot load source file: {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("unsupported dataset kind '{0}'")]
    UnsupportedDataset(String),

    #[error("unknown missing-value strategy '{0}'")]
    UnknownStrategy(String),

    #[error("column '{0}' not found in table")]
    MissingColumn(String),

    /// Aggregation requested over a column with no non-missing values.
    #[error("column '{0}' has no values to aggregate")]
    EmptyAggregate(String),

    #[error("repository is not connected; call connect() first")]
    NotConnected,

    /// A `save_reports` batch failed part-way; the transaction was rolled
    /// back and no rows from the batch were persisted.
    #[error("report import rolled back: {0}")]
    TransactionFailure(#[source] Box<Error>),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("failed to decode input as {0}")]
    Decode(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
