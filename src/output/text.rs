//! Terminal report
//!
//! One aligned line per patched, unchanged or failed manifest, tagged with
//! the size of the bump. Skips are listed only with `-v`.

use crate::domain::{ManifestOutcome, ManifestReport, ReconcileSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::update::parse_version;
use colored::Colorize;
use std::fmt;
use std::io::Write;

/// Which semver component a bump moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    /// One side is not semver
    Unknown,
}

impl BumpKind {
    /// Classify the step from `old` to `new`
    pub fn between(old: &str, new: &str) -> Self {
        let (Some(old), Some(new)) = (parse_version(old), parse_version(new)) else {
            return BumpKind::Unknown;
        };
        if new.major != old.major {
            BumpKind::Major
        } else if new.minor != old.minor {
            BumpKind::Minor
        } else {
            BumpKind::Patch
        }
    }

    /// Render the label, colored by severity when `color` is set
    pub fn render(&self, color: bool) -> String {
        if !color {
            return self.to_string();
        }
        let label = self.to_string();
        match self {
            BumpKind::Major => label.red().bold().to_string(),
            BumpKind::Minor => label.yellow().to_string(),
            BumpKind::Patch => label.green().to_string(),
            BumpKind::Unknown => label.dimmed().to_string(),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::Unknown => "?",
        })
    }
}

/// Human-readable report writer
pub struct TextFormatter {
    verbosity: Verbosity,
    dry_run: bool,
    color: bool,
}

impl TextFormatter {
    /// Formatter with explicit color choice
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    fn is_listed(&self, report: &ManifestReport) -> bool {
        match self.verbosity {
            Verbosity::Quiet => false,
            Verbosity::Normal => !report.outcome.is_skipped(),
            Verbosity::Verbose => true,
        }
    }

    /// Width of the path column for the listed reports
    fn path_width(&self, summary: &ReconcileSummary) -> usize {
        summary
            .manifests
            .iter()
            .filter(|r| self.is_listed(r))
            .map(|r| r.path.display().to_string().len())
            .max()
            .unwrap_or(0)
    }

    fn write_report(
        &self,
        report: &ManifestReport,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let path = format!("{:width$}", report.path.display().to_string(), width = width);

        match &report.outcome {
            ManifestOutcome::Patched {
                record,
                new_version,
                replacements,
            } => {
                let bump = BumpKind::between(&record.current_version, new_version);
                let prefix = self.dry_run_prefix();
                let occurrences = if *replacements > 1 {
                    format!(" x{}", replacements)
                } else {
                    String::new()
                };
                if self.color {
                    writeln!(
                        writer,
                        "{}{}  {} {} {} {} [{}]{}",
                        prefix,
                        path.bold(),
                        record.name,
                        record.current_version.dimmed(),
                        "→".dimmed(),
                        new_version.bright_white().bold(),
                        bump.render(true),
                        occurrences.dimmed()
                    )
                } else {
                    writeln!(
                        writer,
                        "{}{}  {} {} -> {} [{}]{}",
                        prefix,
                        path,
                        record.name,
                        record.current_version,
                        new_version,
                        bump,
                        occurrences
                    )
                }
            }
            ManifestOutcome::Unchanged { record, latest } => {
                let latest = format!("(latest {})", latest);
                if self.color {
                    writeln!(
                        writer,
                        "{}  {} {} {}",
                        path,
                        record.name,
                        record.current_version,
                        latest.dimmed()
                    )
                } else {
                    writeln!(
                        writer,
                        "{}  {} {} {}",
                        path, record.name, record.current_version, latest
                    )
                }
            }
            ManifestOutcome::Failed { record, message } => {
                if self.color {
                    writeln!(
                        writer,
                        "{}  {} {} {}",
                        path,
                        record.name,
                        "failed:".red().bold(),
                        message
                    )
                } else {
                    writeln!(writer, "{}  {} failed: {}", path, record.name, message)
                }
            }
            ManifestOutcome::Skipped { record, reason } => {
                let name = record.as_ref().map(|r| r.name.as_str()).unwrap_or("-");
                let line = format!("{}  {} ({})", path, name, reason);
                if self.color {
                    writeln!(writer, "{}", line.dimmed())
                } else {
                    writeln!(writer, "{}", line)
                }
            }
        }
    }

    /// Patched manifests per bump kind: (major, minor, patch, unknown)
    fn count_by_change_type(&self, summary: &ReconcileSummary) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for report in &summary.manifests {
            if let ManifestOutcome::Patched {
                record,
                new_version,
                ..
            } = &report.outcome
            {
                match BumpKind::between(&record.current_version, new_version) {
                    BumpKind::Major => counts.0 += 1,
                    BumpKind::Minor => counts.1 += 1,
                    BumpKind::Patch => counts.2 += 1,
                    BumpKind::Unknown => counts.3 += 1,
                }
            }
        }
        counts
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        let width = self.path_width(&result.summary);
        let mut listed = false;
        for report in result.summary.manifests.iter().filter(|r| self.is_listed(r)) {
            self.write_report(report, width, writer)?;
            listed = true;
        }
        if listed {
            writeln!(writer)?;
        }

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &ReconcileSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let patched = summary.patched();
        let failed = summary.failed();

        if self.verbosity == Verbosity::Quiet {
            let mut line = if patched > 0 {
                format!("{}{} patched", prefix, patched)
            } else {
                format!("{}No updates", prefix)
            };
            if failed > 0 {
                line.push_str(&format!(", {} failed", failed));
            }
            return writeln!(writer, "{}", line);
        }

        let (major, minor, patch, unknown) = self.count_by_change_type(summary);
        let mut breakdown = Vec::new();
        for (count, label) in [
            (major, "major"),
            (minor, "minor"),
            (patch, "patch"),
            (unknown, "other"),
        ] {
            if count > 0 {
                breakdown.push(format!("{} {}", count, label));
            }
        }

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
        }

        if patched > 0 {
            let count = if self.color {
                patched.to_string().green().to_string()
            } else {
                patched.to_string()
            };
            writeln!(
                writer,
                "  {} manifest(s) patched ({})",
                count,
                breakdown.join(", ")
            )?;
        } else if self.color {
            writeln!(writer, "  {}", "No manifests patched".dimmed())?;
        } else {
            writeln!(writer, "  No manifests patched")?;
        }

        writeln!(writer, "  {} up to date", summary.unchanged())?;
        writeln!(writer, "  {} skipped", summary.skipped())?;
        if failed > 0 {
            if self.color {
                writeln!(writer, "  {} failed", failed.to_string().red())?;
            } else {
                writeln!(writer, "  {} failed", failed)?;
            }
        }

        Ok(())
    }
}
