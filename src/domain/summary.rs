//! Reconciliation summary types
//!
//! Provides structures for tracking outcomes per manifest and across a run.

use super::{ManifestOutcome, Profile, SkipReason};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Outcome for a single manifest file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestReport {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Profile that discovered this manifest
    pub profile: Profile,
    /// What happened to it
    pub outcome: ManifestOutcome,
}

impl ManifestReport {
    /// Creates a new ManifestReport
    pub fn new(path: impl Into<PathBuf>, profile: Profile, outcome: ManifestOutcome) -> Self {
        Self {
            path: path.into(),
            profile,
            outcome,
        }
    }

    /// How much this report says about the file; lower is more telling
    fn weight(&self) -> u8 {
        match &self.outcome {
            ManifestOutcome::Skipped {
                record: None,
                reason: SkipReason::KindMismatch(_),
            } => 2,
            ManifestOutcome::Skipped { record: None, .. } => 1,
            _ => 0,
        }
    }
}

/// Overall summary of a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Reports in the order manifests were processed
    pub manifests: Vec<ManifestReport>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl ReconcileSummary {
    /// Creates a new ReconcileSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            manifests: Vec::new(),
            dry_run,
        }
    }

    /// Adds a manifest report
    pub fn add(&mut self, report: ManifestReport) {
        self.manifests.push(report);
    }

    /// Collapses reports for files matched by more than one profile
    ///
    /// A record-less skip is dropped when the same path has a more telling
    /// report, so each file is counted once. Records are never dropped.
    pub fn drop_shadowed_skips(&mut self) {
        let mut best: HashMap<PathBuf, (u8, usize)> = HashMap::new();
        for (index, report) in self.manifests.iter().enumerate() {
            let weight = report.weight();
            best.entry(report.path.clone())
                .and_modify(|entry| {
                    if weight < entry.0 {
                        *entry = (weight, index);
                    }
                })
                .or_insert((weight, index));
        }

        let mut index = 0;
        self.manifests.retain(|report| {
            let keep = report.weight() == 0 || best[&report.path].1 == index;
            index += 1;
            keep
        });
    }

    /// Returns the total number of manifests examined
    pub fn files_processed(&self) -> usize {
        self.manifests.len()
    }

    /// Returns the number of patched manifests
    pub fn patched(&self) -> usize {
        self.count(ManifestOutcome::is_patched)
    }

    /// Returns the number of manifests already at the latest version
    pub fn unchanged(&self) -> usize {
        self.count(ManifestOutcome::is_unchanged)
    }

    /// Returns the number of skipped manifests
    pub fn skipped(&self) -> usize {
        self.count(ManifestOutcome::is_skipped)
    }

    /// Returns the number of manifests whose patch failed
    pub fn failed(&self) -> usize {
        self.count(ManifestOutcome::is_failed)
    }

    /// Returns reports for a specific profile
    pub fn by_profile(&self, profile: Profile) -> impl Iterator<Item = &ManifestReport> {
        self.manifests.iter().filter(move |m| m.profile == profile)
    }

    fn count(&self, pred: impl Fn(&ManifestOutcome) -> bool) -> usize {
        self.manifests.iter().filter(|m| pred(&m.outcome)).count()
    }
}
