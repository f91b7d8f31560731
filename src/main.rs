//! chartbump - chart and provider version reconciler CLI tool
//!
//! Scans a directory tree for ApplicationSet and Crossplane manifests and
//! rewrites pinned versions that have a newer upstream release.

use chartbump::cli::CliArgs;
use chartbump::config::Config;
use chartbump::orchestrator::Orchestrator;
use chartbump::output::{create_formatter, OutputConfig};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    args.init_logging();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    log::info!("chartbump v{}", env!("CARGO_PKG_VERSION"));
    log::info!("target: {}", args.path.display());
    if args.dry_run {
        log::info!("mode: dry-run");
    }

    if !args.path.is_dir() {
        anyhow::bail!("{} is not a directory", args.path.display());
    }

    let config = Config::load(&args.path, args.config.as_deref())?;

    let orchestrator = Orchestrator::new(args.clone(), config)?;
    let result = orchestrator.run().await;

    let formatter = create_formatter(OutputConfig::from_args(&args));

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.has_failures() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
