//! Dependency records and source locators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of version source a locator points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Helm chart repository index
    Helm,
    /// GitHub "latest release" feed
    GitHub,
    /// OCI artifact registry tag list
    Oci,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Helm => "helm",
            SourceKind::GitHub => "github",
            SourceKind::Oci => "oci",
        };
        write!(f, "{}", name)
    }
}

/// Where to look for a newer version of a dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceLocator {
    /// A chart inside a Helm repository
    Helm { repo_url: String, chart: String },
    /// Releases of a GitHub repository
    GitHub { owner: String, repo: String },
    /// An image inside an OCI registry
    Oci { registry: String, image: String },
}

impl SourceLocator {
    /// Creates a Helm locator
    pub fn helm(repo_url: impl Into<String>, chart: impl Into<String>) -> Self {
        SourceLocator::Helm {
            repo_url: repo_url.into(),
            chart: chart.into(),
        }
    }

    /// Creates a GitHub locator
    pub fn github(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        SourceLocator::GitHub {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Creates an OCI locator
    pub fn oci(registry: impl Into<String>, image: impl Into<String>) -> Self {
        SourceLocator::Oci {
            registry: registry.into(),
            image: image.into(),
        }
    }

    /// Returns the source kind this locator dispatches to
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceLocator::Helm { .. } => SourceKind::Helm,
            SourceLocator::GitHub { .. } => SourceKind::GitHub,
            SourceLocator::Oci { .. } => SourceKind::Oci,
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocator::Helm { repo_url, chart } => write!(f, "{} ({})", chart, repo_url),
            SourceLocator::GitHub { owner, repo } => write!(f, "github.com/{}/{}", owner, repo),
            SourceLocator::Oci { registry, image } => {
                write!(f, "{}/{}", registry.trim_end_matches('/'), image)
            }
        }
    }
}

/// A dependency pinned inside a manifest
///
/// Only built when name, version and locator were all present in the
/// document; extractors never produce partial records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Chart or provider name
    pub name: String,
    /// Version string exactly as written in the manifest
    pub current_version: String,
    /// Where to look for newer versions
    pub locator: SourceLocator,
}

impl DependencyRecord {
    /// Creates a new dependency record
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        locator: SourceLocator,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            locator,
        }
    }

    /// Returns a copy routed to a different locator
    pub fn with_locator(mut self, locator: SourceLocator) -> Self {
        self.locator = locator;
        self
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} [{}]",
            self.name,
            self.current_version,
            self.locator.kind()
        )
    }
}
