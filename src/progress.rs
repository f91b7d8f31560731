//! Progress display for reconciliation runs
//!
//! One spinner per scan profile, ticking with the manifest being examined.
//! Everything goes to stderr so `--json` output on stdout stays clean.

use crate::domain::Profile;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Progress reporter for a reconciliation run
pub struct Progress {
    /// Whether progress display is enabled
    enabled: bool,
    /// Spinner for the profile currently running
    bar: Option<ProgressBar>,
    /// Manifests examined under the current profile
    seen: u64,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: None,
            seen: 0,
        }
    }

    /// Start the spinner for a profile
    pub fn begin_profile(&mut self, profile: Profile) {
        self.finish_and_clear();
        self.seen = 0;
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {prefix:.bold} [{pos}] {wide_msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_prefix(format!("{} manifests", profile));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Report the manifest now being examined
    pub fn manifest(&mut self, path: &Path) {
        self.seen += 1;
        if let Some(ref bar) = self.bar {
            bar.set_position(self.seen);
            bar.set_message(path.display().to_string());
        }
    }

    /// Number of manifests examined under the current profile
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Finish and clear the current spinner
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}
