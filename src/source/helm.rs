//! Helm chart repository adapter
//!
//! Looks up the newest chart version by registering the repository under a
//! throwaway name, refreshing indexes and searching it:
//!
//! ```text
//! helm repo remove <name>          # stale leftovers, output discarded
//! helm repo add <name> <url>
//! helm repo update
//! helm search repo <name>/<chart> -o yaml
//! helm repo remove <name>          # always, via TransientRepo's Drop
//! ```
//!
//! Repository registrations live in helm's global config, so lookups are
//! serialized process-wide and every registration gets a unique name.

use crate::domain::{SourceKind, SourceLocator};
use crate::error::SourceError;
use crate::source::command::{run_checked, CommandRunner};
use crate::source::VersionSource;
use async_trait::async_trait;
use serde::Deserialize;
use serde_yaml::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default helm executable
pub const DEFAULT_HELM_BINARY: &str = "helm";

/// Prefix of transient repository registrations
const REGISTRATION_PREFIX: &str = "chartbump";

/// One writer at a time for helm's repository registry
static HELM_LOCK: Mutex<()> = Mutex::const_new(());

static REGISTRATION_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// One entry of `helm search repo -o yaml`
#[derive(Debug, Deserialize)]
struct SearchEntry {
    #[serde(default)]
    version: Option<Value>,
}

/// Generate a registration name unique to this process and call
fn registration_name() -> String {
    format!(
        "{}-{}-{}",
        REGISTRATION_PREFIX,
        std::process::id(),
        REGISTRATION_COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

/// A repository registration that is removed when dropped
struct TransientRepo<'a> {
    runner: &'a dyn CommandRunner,
    binary: &'a str,
    name: String,
}

impl<'a> TransientRepo<'a> {
    /// Register `url` under a fresh name
    ///
    /// The guard exists before `repo add` runs, so a failed add still gets
    /// cleaned up.
    fn register(
        runner: &'a dyn CommandRunner,
        binary: &'a str,
        url: &str,
    ) -> Result<Self, SourceError> {
        let repo = Self {
            runner,
            binary,
            name: registration_name(),
        };

        // A crashed earlier run may have left the name behind
        let _ = runner.run(binary, &["repo", "remove", &repo.name]);
        run_checked(runner, binary, &["repo", "add", &repo.name, url])?;

        Ok(repo)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TransientRepo<'_> {
    fn drop(&mut self) {
        match self.runner.run(self.binary, &["repo", "remove", &self.name]) {
            Ok(output) if output.success => {}
            Ok(output) => log::debug!(
                "failed to remove helm repo {}: {}",
                self.name,
                output.stderr.trim()
            ),
            Err(e) => log::debug!("failed to remove helm repo {}: {}", self.name, e),
        }
    }
}

/// Helm repository adapter
pub struct HelmRepoClient {
    runner: Arc<dyn CommandRunner>,
    binary: String,
}

impl HelmRepoClient {
    /// Create a new helm adapter
    pub fn new(runner: Arc<dyn CommandRunner>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    /// Parse the version of the first search hit
    fn parse_search_output(output: &str, target: &str) -> Result<String, SourceError> {
        let entries: Vec<SearchEntry> = serde_yaml::from_str(output)
            .map_err(|e| SourceError::invalid_response("helm", target, e.to_string()))?;

        let first = entries
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::no_versions("helm", target))?;

        match first.version {
            Some(Value::String(version)) => Ok(version),
            Some(Value::Number(number)) => Ok(number.to_string()),
            _ => Err(SourceError::invalid_response(
                "helm",
                target,
                "search result has no version",
            )),
        }
    }

    fn lookup(&self, repo_url: &str, chart: &str) -> Result<String, SourceError> {
        let runner = self.runner.as_ref();
        let repo = TransientRepo::register(runner, &self.binary, repo_url)?;

        run_checked(runner, &self.binary, &["repo", "update"])?;

        let query = format!("{}/{}", repo.name(), chart);
        let output = run_checked(
            runner,
            &self.binary,
            &["search", "repo", &query, "-o", "yaml"],
        )?;

        Self::parse_search_output(&output, chart)
    }
}

#[async_trait]
impl VersionSource for HelmRepoClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Helm
    }

    fn source_name(&self) -> &'static str {
        "helm"
    }

    async fn latest_version(&self, locator: &SourceLocator) -> Result<String, SourceError> {
        let SourceLocator::Helm { repo_url, chart } = locator else {
            return Err(SourceError::LocatorMismatch {
                source_name: self.source_name().to_string(),
                locator: locator.to_string(),
            });
        };

        let _guard = HELM_LOCK.lock().await;
        self.lookup(repo_url, chart)
    }
}
