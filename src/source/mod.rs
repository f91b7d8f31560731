//! Version source adapters
//!
//! This module provides:
//! - The VersionSource trait every upstream lookup implements
//! - Helm chart repository adapter (subprocess)
//! - GitHub releases adapter (HTTP)
//! - OCI registry adapter (subprocess)
//! - SourceSet, the kind → adapter table the reconciler dispatches through

mod client;
pub mod command;
mod github;
mod helm;
mod oci;

pub use client::HttpClient;
pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use github::{GitHubReleaseClient, DEFAULT_GITHUB_API_URL};
pub use helm::{HelmRepoClient, DEFAULT_HELM_BINARY};
pub use oci::{OciRegistryClient, DEFAULT_OCI_LISTER};

use crate::config::Config;
use crate::domain::{SourceKind, SourceLocator};
use crate::error::SourceError;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for upstream version sources
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Get the source kind this adapter handles
    fn kind(&self) -> SourceKind;

    /// Get the source name used in logs and errors
    fn source_name(&self) -> &'static str;

    /// Resolve a locator to the newest version the source knows about
    async fn latest_version(&self, locator: &SourceLocator) -> Result<String, SourceError>;

    /// Like `latest_version`, but a failure is logged and flattened to its message
    async fn resolve(&self, locator: &SourceLocator) -> Result<String, String> {
        self.latest_version(locator).await.map_err(|e| {
            log::warn!("{}", e);
            e.to_string()
        })
    }
}

/// One adapter per source kind
#[derive(Clone)]
pub struct SourceSet {
    helm: Arc<dyn VersionSource>,
    github: Arc<dyn VersionSource>,
    oci: Arc<dyn VersionSource>,
}

impl SourceSet {
    /// Create a source set from explicit adapters
    pub fn new(
        helm: Arc<dyn VersionSource>,
        github: Arc<dyn VersionSource>,
        oci: Arc<dyn VersionSource>,
    ) -> Self {
        Self { helm, github, oci }
    }

    /// Create the production source set described by `config`
    pub fn from_config(config: &Config, client: HttpClient) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
        Self::new(
            Arc::new(HelmRepoClient::new(runner.clone(), &config.helm.binary)),
            Arc::new(GitHubReleaseClient::with_api_url(
                client,
                &config.github.api_url,
            )),
            Arc::new(OciRegistryClient::new(runner, &config.oci.binary)),
        )
    }

    /// Get the adapter for a source kind
    pub fn get(&self, kind: SourceKind) -> &Arc<dyn VersionSource> {
        match kind {
            SourceKind::Helm => &self.helm,
            SourceKind::GitHub => &self.github,
            SourceKind::Oci => &self.oci,
        }
    }

    /// Get the adapter a locator dispatches to
    pub fn for_locator(&self, locator: &SourceLocator) -> &Arc<dyn VersionSource> {
        self.get(locator.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_dispatch() {
        let sources = SourceSet::from_config(&Config::default(), HttpClient::new().unwrap());

        assert_eq!(sources.get(SourceKind::Helm).kind(), SourceKind::Helm);
        assert_eq!(sources.get(SourceKind::GitHub).kind(), SourceKind::GitHub);
        assert_eq!(sources.get(SourceKind::Oci).kind(), SourceKind::Oci);
    }

    #[test]
    fn test_for_locator() {
        let sources = SourceSet::from_config(&Config::default(), HttpClient::new().unwrap());

        let locator = SourceLocator::github("aws", "karpenter");
        assert_eq!(sources.for_locator(&locator).source_name(), "github");

        let locator = SourceLocator::oci("xpkg.upbound.io/upbound", "provider-aws");
        assert_eq!(sources.for_locator(&locator).source_name(), "oci");
    }
}
