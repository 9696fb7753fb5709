//! `trend` command: mean value per report date, as a table or a chart
//! object for an external renderer.

use anyhow::{Context, Result};
use log::info;

use crate::{analysis, chart, cli::TrendArgs, display, repository::Repository};

pub fn execute(args: &TrendArgs) -> Result<()> {
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

    let trend = analysis::trend_over_time(&reports, "report_date", "value")
        .context("Aggregating trend over time")?;
    info!(
        "Aggregated {} report(s) into {} dated point(s)",
        reports.row_count(),
        trend.row_count()
    );

    match args.chart {
        Some(kind) => {
            let chart =
                chart::build_chart(&trend, "report_date", "value", &args.title, kind.into())
                    .context("Building chart object")?;
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        None => display::print_preview(&trend, 0),
    }
    Ok(())
}
