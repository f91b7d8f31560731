//! GitHub releases adapter
//!
//! Fetches the tag of the latest published release.
//! API endpoint: {api_url}/repos/{owner}/{repo}/releases/latest
//!
//! Unauthenticated requests are limited to 60/hour; a token lifts that.

use crate::domain::{SourceKind, SourceLocator};
use crate::error::SourceError;
use crate::source::{HttpClient, VersionSource};
use async_trait::async_trait;
use serde::Deserialize;

/// Public GitHub API base URL
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub releases adapter
pub struct GitHubReleaseClient {
    client: HttpClient,
    api_url: String,
}

/// Subset of the release object we care about
#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: Option<String>,
}

impl GitHubReleaseClient {
    /// Create a new adapter against a custom API root (GitHub Enterprise, tests)
    pub fn with_api_url(client: HttpClient, api_url: impl Into<String>) -> Self {
        Self {
            client: client.with_accept(GITHUB_MEDIA_TYPE),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the latest-release URL for a repository
    fn build_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/releases/latest", self.api_url, owner, repo)
    }
}

#[async_trait]
impl VersionSource for GitHubReleaseClient {
    fn kind(&self) -> SourceKind {
        SourceKind::GitHub
    }

    fn source_name(&self) -> &'static str {
        "github"
    }

    async fn latest_version(&self, locator: &SourceLocator) -> Result<String, SourceError> {
        let SourceLocator::GitHub { owner, repo } = locator else {
            return Err(SourceError::LocatorMismatch {
                source_name: self.source_name().to_string(),
                locator: locator.to_string(),
            });
        };

        let target = format!("{}/{}", owner, repo);
        let url = self.build_url(owner, repo);
        let release: Release = self
            .client
            .get_json(&url, &target, self.source_name())
            .await?;

        release
            .tag_name
            .filter(|tag| !tag.trim().is_empty())
            .ok_or_else(|| {
                SourceError::invalid_response(self.source_name(), target, "release has no tag_name")
            })
    }
}
