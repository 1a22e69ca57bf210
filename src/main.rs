mod cli;
mod logging;
mod reporter;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use colored::*;
use dotenv::dotenv;
use dupes_report_csv::{config, Pipeline};
use reporter::CliReporter;
use tracing::{error, info};

fn main() -> ExitCode {
    dotenv().ok();

    // Dropped when main returns, which flushes the file appender.
    let _guard = logging::init_logger();

    let args = Cli::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = config::load_configuration().context("Error loading configuration")?;

    let pipeline = Pipeline::new(config);
    let result = pipeline
        .run(&args.input, &args.output, Arc::new(CliReporter::new()))
        .with_context(|| format!("Could not summarize into '{}'", args.output.display()))?;

    info!(
        "{} groups loaded, {} summarized, {} rows written in {}",
        format!("{}", result.records_loaded).cyan(),
        format!("{}", result.records_summarized).cyan(),
        format!("{}", result.rows_written).green(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );

    Ok(())
}
