//! `query` command: filtered report listing.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::QueryArgs, display, repository::Repository};

pub fn execute(args: &QueryArgs) -> Result<()> {
    let criteria = args.filter.criteria();
    let (predicate, params) = criteria.to_query_predicate();

    let mut repo = Repository::new(&args.db);
    repo.connect()
        .with_context(|| format!("Opening database {:?}", args.db))?;
    repo.init_schema().context("Initializing database schema")?;
    let reports = repo
        .query_reports(&predicate, &params)
        .context("Querying reports")?;
    repo.disconnect();

    info!("Found {} matching report(s)", reports.row_count());
    display::print_preview(&reports, args.limit);
    Ok(())
}
