//! `import` command: CSV → normalize → clean → save.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::ImportArgs,
    normalize,
    repository::Repository,
    source::{self, CsvSource},
};

pub fn execute(args: &ImportArgs) -> Result<()> {
    let delimiter = source::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = source::resolve_encoding(args.input_encoding.as_deref())
        .with_context(|| format!("Resolving encoding for {:?}", args.input))?;

    info!(
        "Importing '{}' into {:?} ({} dataset)",
        args.input.display(),
        args.db,
        args.dataset
    );

    let raw = CsvSource::new(&args.input, delimiter, encoding)
        .load()
        .with_context(|| format!("Loading {:?}", args.input))?;
    info!("Loaded {} row(s) from source", raw.row_count());

    let normalized = normalize::normalize_schema(&raw, args.dataset)
        .context("Normalizing source schema to long format")?;
    info!("Normalized to {} row(s) (long format)", normalized.row_count());

    let cleaned = normalize::handle_missing(&normalized, args.missing);
    info!(
        "{} row(s) after '{}' missing-value handling",
        cleaned.row_count(),
        args.missing
    );

    let mut repo = Repository::new(&args.db);
    repo.connect()
        .with_context(|| format!("Opening database {:?}", args.db))?;
    repo.init_schema().context("Initializing database schema")?;
    let inserted = repo
        .save_reports(&cleaned)
        .context("Saving reports to the database")?;
    repo.disconnect();

    info!("Imported {} report(s) into {:?}", inserted, args.db);
    Ok(())
}
