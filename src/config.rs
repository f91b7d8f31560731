//! Settings file loading
//!
//! Configuration is read from (in priority order):
//! - the file passed with `--config`
//! - `.chartbump.toml` in the scanned root
//! - built-in defaults
//!
//! ```toml
//! [helm]
//! binary = "helm"
//!
//! [oci]
//! binary = "crane"
//!
//! [github]
//! api_url = "https://api.github.com"
//!
//! [profiles]
//! crossplane = "platform/crossplane/**/values.yaml"
//!
//! [[overrides]]
//! chart = "karpenter"
//! owner = "aws"
//! repo = "karpenter"
//! ```

use crate::domain::{DependencyRecord, Profile, SourceLocator};
use crate::error::ConfigError;
use crate::source::{DEFAULT_GITHUB_API_URL, DEFAULT_HELM_BINARY, DEFAULT_OCI_LISTER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".chartbump.toml";

/// Charts whose helm repositories do not carry usable versions; their
/// upstream GitHub releases are consulted instead
const BUILTIN_OVERRIDES: &[(&str, &str, &str)] = &[
    ("karpenter", "aws", "karpenter"),
    (
        "aws-gateway-controller-chart",
        "aws",
        "aws-application-networking-k8s",
    ),
];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub helm: HelmConfig,
    pub oci: OciConfig,
    pub github: GitHubConfig,
    pub profiles: ProfilePatterns,
    /// Extra chart → GitHub repository routes; replace built-ins by chart name
    pub overrides: Vec<GitHubOverride>,
}

/// Helm tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmConfig {
    pub binary: String,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_HELM_BINARY.to_string(),
        }
    }
}

/// Registry tag lister configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OciConfig {
    pub binary: String,
}

impl Default for OciConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_OCI_LISTER.to_string(),
        }
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
        }
    }
}

/// Per-profile scan pattern overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePatterns {
    pub application_set: Option<String>,
    pub crossplane: Option<String>,
}

/// Route a chart name to a GitHub repository's releases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubOverride {
    pub chart: String,
    pub owner: String,
    pub repo: String,
}

impl GitHubOverride {
    /// Create a new override
    pub fn new(
        chart: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            chart: chart.into(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl Config {
    /// Load configuration for a scan rooted at `root`
    ///
    /// An explicit path must exist. The root-level file is optional, but once
    /// present it has to parse.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let local = root.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::from_file(&local);
        }

        Ok(Self::default())
    }

    /// Read and parse a settings file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from(path),
            message: e.to_string(),
        })
    }

    /// Scan pattern configured for a profile, if overridden
    pub fn pattern_for(&self, profile: Profile) -> Option<&str> {
        match profile {
            Profile::ApplicationSet => self.profiles.application_set.as_deref(),
            Profile::Crossplane => self.profiles.crossplane.as_deref(),
        }
    }

    /// All chart → GitHub routes in effect, configured ones first
    pub fn overrides(&self) -> Vec<GitHubOverride> {
        let mut routes = self.overrides.clone();
        for (chart, owner, repo) in BUILTIN_OVERRIDES {
            if !routes.iter().any(|o| o.chart == *chart) {
                routes.push(GitHubOverride::new(*chart, *owner, *repo));
            }
        }
        routes
    }

    /// GitHub locator forced for a chart name, if any
    pub fn override_for(&self, name: &str) -> Option<SourceLocator> {
        self.overrides()
            .into_iter()
            .find(|o| o.chart == name)
            .map(|o| SourceLocator::github(o.owner, o.repo))
    }

    /// Apply name-based routing to an extracted record
    ///
    /// Overrides win over whatever locator the manifest declared.
    pub fn route(&self, record: DependencyRecord) -> DependencyRecord {
        match self.override_for(&record.name) {
            Some(locator) => record.with_locator(locator),
            None => record,
        }
    }
}
