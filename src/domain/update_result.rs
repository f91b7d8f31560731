//! Reconciliation outcome types

use super::DependencyRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of comparing a manifest's version against the latest upstream one
///
/// `None` means "leave the manifest alone"; `Some` carries the version to
/// write.
pub type UpdateDecision = Option<String>;

/// Reason why a manifest was not reconciled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// File could not be read or is not valid YAML
    NotYaml(String),
    /// Document declares a different top-level `kind`
    KindMismatch(Option<String>),
    /// Document does not have the shape the profile's extractor expects
    ShapeMismatch,
    /// Version source failed or had nothing usable
    SourceUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotYaml(msg) => write!(f, "not readable YAML: {}", msg),
            SkipReason::KindMismatch(Some(kind)) => write!(f, "kind is {}", kind),
            SkipReason::KindMismatch(None) => write!(f, "no kind declared"),
            SkipReason::ShapeMismatch => write!(f, "no recognised dependency fields"),
            SkipReason::SourceUnavailable(msg) => write!(f, "source unavailable: {}", msg),
        }
    }
}

/// Terminal state of one manifest's reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManifestOutcome {
    /// Manifest was not reconciled
    Skipped {
        /// Record, if extraction got that far
        #[serde(skip_serializing_if = "Option::is_none")]
        record: Option<DependencyRecord>,
        reason: SkipReason,
    },
    /// Source resolved, but no newer version exists (or versions did not parse)
    Unchanged {
        record: DependencyRecord,
        latest: String,
    },
    /// Manifest was rewritten (or would be, in dry-run mode)
    Patched {
        record: DependencyRecord,
        new_version: String,
        /// Number of substring occurrences replaced
        replacements: usize,
    },
    /// A newer version was found but writing the file failed
    Failed {
        record: DependencyRecord,
        message: String,
    },
}

impl ManifestOutcome {
    /// Creates a Skipped outcome without a record
    pub fn skip(reason: SkipReason) -> Self {
        ManifestOutcome::Skipped {
            record: None,
            reason,
        }
    }

    /// Creates a Skipped outcome for a record whose source failed
    pub fn source_unavailable(record: DependencyRecord, message: impl Into<String>) -> Self {
        ManifestOutcome::Skipped {
            record: Some(record),
            reason: SkipReason::SourceUnavailable(message.into()),
        }
    }

    /// Returns true if the manifest was patched
    pub fn is_patched(&self) -> bool {
        matches!(self, ManifestOutcome::Patched { .. })
    }

    /// Returns true if the manifest was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, ManifestOutcome::Skipped { .. })
    }

    /// Returns true if the manifest was left unchanged after a lookup
    pub fn is_unchanged(&self) -> bool {
        matches!(self, ManifestOutcome::Unchanged { .. })
    }

    /// Returns true if patching failed
    pub fn is_failed(&self) -> bool {
        matches!(self, ManifestOutcome::Failed { .. })
    }

    /// Returns the dependency record, if one was extracted
    pub fn record(&self) -> Option<&DependencyRecord> {
        match self {
            ManifestOutcome::Skipped { record, .. } => record.as_ref(),
            ManifestOutcome::Unchanged { record, .. }
            | ManifestOutcome::Patched { record, .. }
            | ManifestOutcome::Failed { record, .. } => Some(record),
        }
    }
}

impl fmt::Display for ManifestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestOutcome::Skipped {
                record: Some(record),
                reason,
            } => write!(f, "{}: skipped ({})", record.name, reason),
            ManifestOutcome::Skipped { record: None, reason } => {
                write!(f, "skipped ({})", reason)
            }
            ManifestOutcome::Unchanged { record, latest } => write!(
                f,
                "{}: {} is current (latest {})",
                record.name, record.current_version, latest
            ),
            ManifestOutcome::Patched {
                record,
                new_version,
                ..
            } => write!(
                f,
                "{}: {} → {}",
                record.name, record.current_version, new_version
            ),
            ManifestOutcome::Failed { record, message } => {
                write!(f, "{}: failed ({})", record.name, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceLocator;

    fn sample_record() -> DependencyRecord {
        DependencyRecord::new(
            "cert-manager",
            "v1.13.2",
            SourceLocator::helm("https://charts.jetstack.io", "cert-manager"),
        )
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::ShapeMismatch.to_string(),
            "no recognised dependency fields"
        );
        assert_eq!(
            SkipReason::KindMismatch(Some("Application".to_string())).to_string(),
            "kind is Application"
        );
        assert_eq!(
            SkipReason::KindMismatch(None).to_string(),
            "no kind declared"
        );
        assert_eq!(
            SkipReason::SourceUnavailable("HTTP 404".to_string()).to_string(),
            "source unavailable: HTTP 404"
        );
    }

    #[test]
    fn test_outcome_predicates() {
        let patched = ManifestOutcome::Patched {
            record: sample_record(),
            new_version: "v1.14.0".to_string(),
            replacements: 1,
        };
        assert!(patched.is_patched());
        assert!(!patched.is_skipped());
        assert_eq!(patched.record().unwrap().name, "cert-manager");

        let skipped = ManifestOutcome::skip(SkipReason::ShapeMismatch);
        assert!(skipped.is_skipped());
        assert!(skipped.record().is_none());

        let unavailable = ManifestOutcome::source_unavailable(sample_record(), "timeout");
        assert!(unavailable.is_skipped());
        assert!(unavailable.record().is_some());
    }

    #[test]
    fn test_outcome_display() {
        let patched = ManifestOutcome::Patched {
            record: sample_record(),
            new_version: "v1.14.0".to_string(),
            replacements: 2,
        };
        assert_eq!(patched.to_string(), "cert-manager: v1.13.2 → v1.14.0");

        let unchanged = ManifestOutcome::Unchanged {
            record: sample_record(),
            latest: "v1.13.2".to_string(),
        };
        assert!(unchanged.to_string().contains("is current"));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ManifestOutcome::skip(SkipReason::ShapeMismatch);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "skipped");
        assert_eq!(json["reason"]["reason"], "shape_mismatch");
    }
}
