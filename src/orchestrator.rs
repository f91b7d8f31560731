//! Reconciliation orchestrator
//!
//! This module provides:
//! - Workflow coordination: scan → load → extract → route → resolve → compare → patch
//! - One pass per active profile, in a fixed order
//! - Dry-run mode support
//! - Per-manifest error containment: one bad manifest never aborts the run

use crate::cli::CliArgs;
use crate::config::Config;
use crate::domain::{ManifestOutcome, ManifestReport, Profile, ReconcileSummary, SkipReason};
use crate::error::{ManifestError, SourceError};
use crate::manifest::{
    document_kind, get_extractor, load_document, scan_profile, Patcher, SubstringPatcher,
};
use crate::progress::Progress;
use crate::source::{HttpClient, SourceSet};
use crate::update::compare;
use std::path::Path;
use thiserror::Error;

/// Orchestrator for coordinating the reconciliation workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Settings file contents (or defaults)
    config: Config,
    /// One version source per locator kind
    sources: SourceSet,
    /// Rewrites manifests in place (or pretends to, in dry-run mode)
    patcher: Box<dyn Patcher + Send + Sync>,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Per-manifest outcomes
    pub summary: ReconcileSummary,
    /// Errors that stopped a whole profile from being scanned
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if any manifest ended in `Failed`
    pub fn has_failures(&self) -> bool {
        self.summary.failed() > 0
    }
}

/// Errors that can occur during orchestration
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] SourceError),

    /// Scan pattern for a profile was unusable
    #[error("failed to scan {profile} manifests: {source}")]
    Scan {
        profile: Profile,
        #[source]
        source: ManifestError,
    },
}

impl Orchestrator {
    /// Create a new orchestrator with production version sources
    pub fn new(args: CliArgs, config: Config) -> Result<Self, OrchestratorError> {
        let client = HttpClient::new()
            .map_err(OrchestratorError::HttpClient)?
            .with_bearer_token(args.github_token.clone());
        let sources = SourceSet::from_config(&config, client);

        Ok(Self::with_sources(args, config, sources))
    }

    /// Create an orchestrator with custom version sources (for testing)
    pub fn with_sources(args: CliArgs, config: Config, sources: SourceSet) -> Self {
        let patcher = Box::new(SubstringPatcher::new(args.dry_run));
        Self {
            args,
            config,
            sources,
            patcher,
        }
    }

    /// Run the reconciliation workflow
    pub async fn run(&self) -> OrchestratorResult {
        self.run_with_progress(self.args.show_progress()).await
    }

    /// Run the reconciliation workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = ReconcileSummary::new(self.args.dry_run);
        let mut errors = Vec::new();

        for profile in self.args.active_profiles() {
            progress.begin_profile(profile);

            let paths = match scan_profile(
                &self.args.path,
                profile,
                self.config.pattern_for(profile),
            ) {
                Ok(paths) => paths,
                Err(e) => {
                    log::error!("{}", e);
                    errors.push(OrchestratorError::Scan { profile, source: e });
                    continue;
                }
            };

            for path in paths {
                progress.manifest(&path);
                let outcome = self.reconcile_manifest(&path, profile).await;
                summary.add(ManifestReport::new(path, profile, outcome));
            }

            log::info!(
                "{} profile: {} manifest(s) examined",
                profile,
                progress.seen()
            );
            progress.finish_and_clear();
        }

        summary.drop_shadowed_skips();
        OrchestratorResult { summary, errors }
    }

    /// Drive one manifest through the pipeline to a terminal outcome
    pub async fn reconcile_manifest(&self, path: &Path, profile: Profile) -> ManifestOutcome {
        let doc = match load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                log::debug!("skipping {}: {}", path.display(), e);
                return ManifestOutcome::skip(SkipReason::NotYaml(e.to_string()));
            }
        };

        if let Some(required) = profile.required_kind() {
            let kind = document_kind(&doc);
            if kind != Some(required) {
                log::debug!("skipping {}: kind {:?}", path.display(), kind);
                return ManifestOutcome::skip(SkipReason::KindMismatch(kind.map(str::to_string)));
            }
        }

        let extractor = get_extractor(profile);
        let Some(record) = extractor.extract(&doc) else {
            log::debug!(
                "skipping {}: no {} fields",
                path.display(),
                extractor.name()
            );
            return ManifestOutcome::skip(SkipReason::ShapeMismatch);
        };

        let record = self.config.route(record);
        let source = self.sources.for_locator(&record.locator);
        log::debug!(
            "{}: resolving {} via {}",
            path.display(),
            record,
            source.source_name()
        );

        let latest = match source.resolve(&record.locator).await {
            Ok(latest) => latest,
            Err(message) => return ManifestOutcome::source_unavailable(record, message),
        };

        let Some(new_version) = compare(&record.current_version, Some(&latest)) else {
            log::debug!(
                "{}: {} is current (latest {})",
                record.name,
                record.current_version,
                latest
            );
            return ManifestOutcome::Unchanged { record, latest };
        };

        match self
            .patcher
            .apply(path, &record.current_version, Some(&new_version))
        {
            Ok(result) if result.has_changes() => {
                log::info!(
                    "{}: {} → {} in {}",
                    record.name,
                    record.current_version,
                    new_version,
                    path.display()
                );
                ManifestOutcome::Patched {
                    record,
                    new_version,
                    replacements: result.replacements,
                }
            }
            Ok(_) => {
                log::warn!(
                    "{}: {} not found verbatim in {}",
                    record.name,
                    record.current_version,
                    path.display()
                );
                let message = format!("'{}' does not occur in the file", record.current_version);
                ManifestOutcome::Failed { record, message }
            }
            Err(e) => {
                log::warn!("{}: {}", record.name, e);
                ManifestOutcome::Failed {
                    record,
                    message: e.to_string(),
                }
            }
        }
    }
}
