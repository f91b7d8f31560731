//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of reconciliation results
//! - Structured per-manifest outcome information

use crate::domain::{ManifestOutcome, ManifestReport, Profile, ReconcileSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    dry_run: bool,
    summary: JsonSummary,
    /// Per-manifest results
    manifests: Vec<JsonManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    files_processed: usize,
    patched: usize,
    unchanged: usize,
    skipped: usize,
    failed: usize,
    /// Breakdown by profile (verbose only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    by_profile: Vec<JsonProfileSummary>,
}

#[derive(Serialize)]
struct JsonProfileSummary {
    profile: String,
    files_processed: usize,
    patched: usize,
}

/// JSON representation of a manifest report
#[derive(Serialize)]
struct JsonManifest {
    path: String,
    profile: String,
    /// patched, unchanged, skipped or failed
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replacements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl JsonFormatter {
    fn is_listed(&self, report: &ManifestReport) -> bool {
        self.verbosity == Verbosity::Verbose || !report.outcome.is_skipped()
    }

    fn summary_to_json(&self, summary: &ReconcileSummary) -> JsonSummary {
        let by_profile = if self.verbosity == Verbosity::Verbose {
            Profile::all()
                .iter()
                .filter_map(|profile| {
                    let reports: Vec<_> = summary.by_profile(*profile).collect();
                    if reports.is_empty() {
                        return None;
                    }
                    Some(JsonProfileSummary {
                        profile: profile.to_string(),
                        files_processed: reports.len(),
                        patched: reports.iter().filter(|r| r.outcome.is_patched()).count(),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        JsonSummary {
            files_processed: summary.files_processed(),
            patched: summary.patched(),
            unchanged: summary.unchanged(),
            skipped: summary.skipped(),
            failed: summary.failed(),
            by_profile,
        }
    }

    /// Convert a manifest report to its JSON representation
    fn manifest_to_json(report: &ManifestReport) -> JsonManifest {
        let record = report.outcome.record();
        let mut manifest = JsonManifest {
            path: report.path.display().to_string(),
            profile: report.profile.to_string(),
            status: "skipped",
            name: record.map(|r| r.name.clone()),
            source: record.map(|r| r.locator.to_string()),
            from: record.map(|r| r.current_version.clone()),
            to: None,
            replacements: None,
            reason: None,
        };

        match &report.outcome {
            ManifestOutcome::Skipped { reason, .. } => {
                manifest.reason = Some(reason.to_string());
            }
            ManifestOutcome::Unchanged { latest, .. } => {
                manifest.status = "unchanged";
                manifest.to = Some(latest.clone());
            }
            ManifestOutcome::Patched {
                new_version,
                replacements,
                ..
            } => {
                manifest.status = "patched";
                manifest.to = Some(new_version.clone());
                manifest.replacements = Some(*replacements);
            }
            ManifestOutcome::Failed { message, .. } => {
                manifest.status = "failed";
                manifest.reason = Some(message.clone());
            }
        }

        manifest
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: result.summary.dry_run,
            summary: self.summary_to_json(&result.summary),
            manifests: result
                .summary
                .manifests
                .iter()
                .filter(|r| self.is_listed(r))
                .map(Self::manifest_to_json)
                .collect(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        Self::write_json(&output, writer)
    }

    fn format_summary(
        &self,
        summary: &ReconcileSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Self::write_json(&self.summary_to_json(summary), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyRecord, SkipReason, SourceLocator};

    fn provider() -> DependencyRecord {
        DependencyRecord::new(
            "provider-aws",
            "v0.47.0",
            SourceLocator::oci("xpkg.upbound.io/upbound", "provider-aws"),
        )
    }

    fn sample_result() -> OrchestratorResult {
        let mut summary = ReconcileSummary::new(true);
        summary.add(ManifestReport::new(
            "crossplane/aws/values.yaml",
            Profile::Crossplane,
            ManifestOutcome::Patched {
                record: provider(),
                new_version: "v0.48.0".to_string(),
                replacements: 2,
            },
        ));
        summary.add(ManifestReport::new(
            "addons/notes.yaml",
            Profile::ApplicationSet,
            ManifestOutcome::skip(SkipReason::ShapeMismatch),
        ));
        OrchestratorResult {
            summary,
            errors: Vec::new(),
        }
    }

    fn render(formatter: &JsonFormatter, result: &OrchestratorResult) -> serde_json::Value {
        let mut output = Vec::new();
        formatter.format(result, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_json_format() {
        let json = render(&JsonFormatter::new(Verbosity::Normal), &sample_result());

        assert_eq!(json["dry_run"], true);
        assert_eq!(json["summary"]["files_processed"], 2);
        assert_eq!(json["summary"]["patched"], 1);
        assert_eq!(json["summary"]["skipped"], 1);
        assert!(json["summary"].get("by_profile").is_none());
        assert!(json.get("errors").is_none());

        let manifests = json["manifests"].as_array().unwrap();
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0]["status"], "patched");
        assert_eq!(manifests[0]["name"], "provider-aws");
        assert_eq!(manifests[0]["source"], "xpkg.upbound.io/upbound/provider-aws");
        assert_eq!(manifests[0]["from"], "v0.47.0");
        assert_eq!(manifests[0]["to"], "v0.48.0");
        assert_eq!(manifests[0]["replacements"], 2);
    }

    #[test]
    fn test_json_verbose_includes_skips() {
        let json = render(&JsonFormatter::new(Verbosity::Verbose), &sample_result());

        let manifests = json["manifests"].as_array().unwrap();
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[1]["status"], "skipped");
        assert_eq!(manifests[1]["reason"], "no recognised dependency fields");
        assert!(manifests[1].get("name").is_none());

        let by_profile = json["summary"]["by_profile"].as_array().unwrap();
        assert_eq!(by_profile.len(), 2);
    }

    #[test]
    fn test_json_format_summary() {
        let formatter = JsonFormatter::new(Verbosity::Normal);
        let mut output = Vec::new();
        formatter
            .format_summary(&sample_result().summary, &mut output)
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["patched"], 1);
        assert_eq!(json["failed"], 0);
    }
}
