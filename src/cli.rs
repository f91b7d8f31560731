//! CLI argument parsing module for chartbump

use crate::domain::Profile;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Parse a scan profile name
fn parse_profile(s: &str) -> Result<Profile, String> {
    s.parse::<Profile>().map_err(|e| e.to_string())
}

/// Bump Helm chart and Crossplane provider versions in YAML manifests
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chartbump",
    version,
    about = "Update chart and provider versions pinned in YAML manifests"
)]
pub struct CliArgs {
    /// Root directory to scan
    pub path: PathBuf,

    // General options
    /// Dry run mode - report what would change without writing files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable quiet mode - no logs or progress, report only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    // Scan options
    /// Run only the given profile (applicationset, crossplane); repeatable
    #[arg(long = "profile", value_parser = parse_profile, action = ArgAction::Append)]
    pub profiles: Vec<Profile>,

    /// Settings file (default: <PATH>/.chartbump.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    // Source options
    /// Token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Profiles to run, in execution order
    pub fn active_profiles(&self) -> Vec<Profile> {
        Profile::all()
            .iter()
            .copied()
            .filter(|p| self.profiles.is_empty() || self.profiles.contains(p))
            .collect()
    }

    /// Log level implied by -v / -q
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Whether to draw progress spinners
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        env_logger::Builder::from_default_env()
            .filter_level(self.log_level())
            .format_timestamp(None)
            .init();
    }
}
