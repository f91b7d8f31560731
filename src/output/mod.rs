//! Run report rendering
//!
//! Two renderings of an [`OrchestratorResult`]: a colored listing for
//! terminals ([`TextFormatter`]) and a stable JSON document for scripts
//! ([`JsonFormatter`]).

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::{BumpKind, TextFormatter};

use crate::cli::CliArgs;
use crate::domain::ReconcileSummary;
use crate::orchestrator::OrchestratorResult;
use std::io::Write;

/// Report encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How much of the run gets reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Summary only
    Quiet,
    /// Patched, unchanged and failed manifests
    #[default]
    Normal,
    /// Skipped manifests too
    Verbose,
}

/// Report settings derived from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Prefix text output with a dry-run marker
    pub dry_run: bool,
    /// ANSI colors in text output; `colored` still honours NO_COLOR
    pub color: bool,
}

impl OutputConfig {
    /// Derive report settings from parsed arguments
    pub fn from_args(args: &CliArgs) -> Self {
        let verbosity = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, _) => Verbosity::Verbose,
        };

        Self {
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            verbosity,
            dry_run: args.dry_run,
            color: true,
        }
    }
}

/// A way of writing a run report
pub trait OutputFormatter {
    /// Write the complete report
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Write only the totals
    fn format_summary(
        &self,
        summary: &ReconcileSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Pick the formatter for a configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(
            config.verbosity,
            config.dry_run,
            config.color,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}
