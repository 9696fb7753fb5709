//! `stats` command: overall or grouped summary of report values.

use anyhow::{Context, Result};
use log::info;

use crate::{analysis, cli::StatsArgs, display, repository::Repository};

pub fn execute(args: &StatsArgs) -> Result<()> {
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

    if !args.group_by.is_empty() {
        let columns = args
            .group_by
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>();
        let grouped = analysis::group_aggregate(&reports, &columns, "value")
            .context("Computing grouped means")?;
        info!(
            "Computed mean value for {} group(s) over {} report(s)",
            grouped.row_count(),
            reports.row_count()
        );
        display::print_preview(&grouped, 0);
        return Ok(());
    }

    let stats =
        analysis::summary_stats(&reports, "value").context("Computing summary statistics")?;
    info!("Summarized {} report value(s)", stats.count);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        let headers = ["count", "mean", "min", "max"]
            .map(String::from)
            .to_vec();
        let row = vec![
            stats.count.to_string(),
            format!("{:.4}", stats.mean),
            format!("{:.4}", stats.min),
            format!("{:.4}", stats.max),
        ];
        display::print_table(&headers, &[row]);
    }
    Ok(())
}
