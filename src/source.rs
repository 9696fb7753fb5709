//! World Bank CSV source reading and validation.
//!
//! World Bank WDI exports prefix the header row with four metadata lines
//! (dataset name, last-updated stamp, and a blank spacer pair). The reader
//! skips those, then parses the remainder as an ordinary header-plus-rows
//! delimited table. `load` is all-or-nothing: a structural error anywhere in
//! the file fails the whole read.

use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8};

use crate::{
    error::{Error, Result},
    table::{DataTable, Value},
};

/// Leading metadata lines before the header row in a World Bank export.
pub const METADATA_ROWS: usize = 4;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(value.trim().to_string()))
    } else {
        Ok(UTF_8)
    }
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
    encoding: &'static Encoding,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8, encoding: &'static Encoding) -> Self {
        Self {
            path: path.into(),
            delimiter,
            encoding,
        }
    }

    /// Opens `path` with the delimiter inferred from its extension and UTF-8
    /// decoding (BOM tolerated).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let delimiter = resolve_input_delimiter(&path, None);
        Self::new(path, delimiter, UTF_8)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff the file exists, is non-empty, and a header row parses after
    /// the metadata skip. Probe failures never escalate to errors here.
    pub fn validate(&self) -> bool {
        self.probe_headers().is_ok()
    }

    /// Loads the full table (header plus data rows), columns exactly as
    /// present in the file. Fails with [`Error::InvalidSource`] when
    /// validation fails and propagates structural errors otherwise, so a
    /// partially-read table is never returned.
    pub fn load(&self) -> Result<DataTable> {
        if !self.validate() {
            return Err(Error::InvalidSource(self.path.clone()));
        }

        let text = self.read_decoded()?;
        let body = skip_lines(&text, METADATA_ROWS);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .double_quote(true)
            .flexible(false)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();
        let mut table = DataTable::new(headers);
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    let trimmed = field.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(Value::String(trimmed.to_string()))
                    }
                })
                .collect();
            table.push_row(row);
        }
        Ok(table)
    }

    fn probe_headers(&self) -> Result<()> {
        let metadata = fs::metadata(&self.path)?;
        if !metadata.is_file() || metadata.len() == 0 {
            return Err(Error::InvalidSource(self.path.clone()));
        }
        let text = self.read_decoded()?;
        let body = skip_lines(&text, METADATA_ROWS);
        if body.trim().is_empty() {
            return Err(Error::InvalidSource(self.path.clone()));
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .from_reader(body.as_bytes());
        let headers = reader.headers()?;
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Error::InvalidSource(self.path.clone()));
        }
        Ok(())
    }

    fn read_decoded(&self) -> Result<String> {
        let bytes = fs::read(&self.path)?;
        let (text, _, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            return Err(Error::Decode(self.encoding.name()));
        }
        Ok(text.into_owned())
    }
}

fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}
