pub mod analysis;
pub mod chart;
pub mod cli;
pub mod display;
pub mod error;
pub mod filter;
pub mod import;
pub mod normalize;
pub mod query;
pub mod repository;
pub mod source;
pub mod summary;
pub mod table;
pub mod trend;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("health_insights", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Import(args) => import::execute(&args),
        Commands::Query(args) => query::execute(&args),
        Commands::Stats(args) => summary::execute(&args),
        Commands::Trend(args) => trend::execute(&args),
    }
}
