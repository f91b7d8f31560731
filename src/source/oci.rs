//! OCI registry adapter
//!
//! Lists every tag of an image with an external lister (`crane ls` by
//! default), drops release candidates and anything that is not semver, and
//! reports the highest remaining version with a `v` prefix.

use crate::domain::{SourceKind, SourceLocator};
use crate::error::SourceError;
use crate::source::command::{run_checked, CommandRunner};
use crate::source::VersionSource;
use crate::update::latest_of;
use async_trait::async_trait;
use std::sync::Arc;

/// Default tag lister executable
pub const DEFAULT_OCI_LISTER: &str = "crane";

/// OCI registry adapter
pub struct OciRegistryClient {
    runner: Arc<dyn CommandRunner>,
    binary: String,
}

impl OciRegistryClient {
    /// Create a new OCI adapter
    pub fn new(runner: Arc<dyn CommandRunner>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    /// Full image reference for a registry and image name
    fn reference(registry: &str, image: &str) -> String {
        format!("{}/{}", registry.trim_end_matches('/'), image)
    }

    fn list_tags(&self, reference: &str) -> Result<String, SourceError> {
        run_checked(self.runner.as_ref(), &self.binary, &["ls", reference])
    }
}

#[async_trait]
impl VersionSource for OciRegistryClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Oci
    }

    fn source_name(&self) -> &'static str {
        "oci"
    }

    async fn latest_version(&self, locator: &SourceLocator) -> Result<String, SourceError> {
        let SourceLocator::Oci { registry, image } = locator else {
            return Err(SourceError::LocatorMismatch {
                source_name: self.source_name().to_string(),
                locator: locator.to_string(),
            });
        };

        let reference = Self::reference(registry, image);
        let listing = self.list_tags(&reference)?;
        log::debug!("{} tags listed for {}", listing.lines().count(), reference);

        latest_of(listing.lines()).ok_or_else(|| SourceError::no_versions("oci", reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::command::CommandOutput;
    use std::io;
    use std::sync::Mutex;

    struct FakeLister {
        output: CommandOutput,
        seen: Mutex<Vec<String>>,
    }

    impl FakeLister {
        fn new(output: CommandOutput) -> Arc<Self> {
            Arc::new(Self {
                output,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl CommandRunner for FakeLister {
        fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{} {}", program, args.join(" ")));
            Ok(self.output.clone())
        }
    }

    fn locator() -> SourceLocator {
        SourceLocator::oci("xpkg.upbound.io/upbound", "provider-family-aws")
    }

    #[tokio::test]
    async fn test_latest_excludes_release_candidates() {
        let lister = FakeLister::new(CommandOutput::ok("v1.0.0\nv1.1.0-rc.1\nv1.2.0\n"));
        let client = OciRegistryClient::new(lister.clone(), DEFAULT_OCI_LISTER);

        assert_eq!(client.latest_version(&locator()).await.unwrap(), "v1.2.0");
        assert_eq!(
            lister.seen.lock().unwrap()[0],
            "crane ls xpkg.upbound.io/upbound/provider-family-aws"
        );
    }

    #[tokio::test]
    async fn test_latest_orders_numerically() {
        let lister = FakeLister::new(CommandOutput::ok("v0.9.0\nv0.10.0\nv0.47.0\nv0.48.0\n"));
        let client = OciRegistryClient::new(lister, DEFAULT_OCI_LISTER);
        assert_eq!(client.latest_version(&locator()).await.unwrap(), "v0.48.0");
    }

    #[tokio::test]
    async fn test_empty_listing_is_no_versions() {
        let lister = FakeLister::new(CommandOutput::ok(""));
        let client = OciRegistryClient::new(lister, DEFAULT_OCI_LISTER);

        let err = client.latest_version(&locator()).await.unwrap_err();
        assert!(matches!(err, SourceError::NoVersions { .. }));
    }

    #[tokio::test]
    async fn test_only_release_candidates_is_no_versions() {
        let lister = FakeLister::new(CommandOutput::ok("v2.0.0-rc.1\nv2.0.0-rc.2\n"));
        let client = OciRegistryClient::new(lister, DEFAULT_OCI_LISTER);
        let message = client.resolve(&locator()).await.unwrap_err();
        assert!(message.contains("no usable versions"));
    }

    #[tokio::test]
    async fn test_lister_failure() {
        let lister = FakeLister::new(CommandOutput::failed("UNAUTHORIZED"));
        let client = OciRegistryClient::new(lister, DEFAULT_OCI_LISTER);

        let err = client.latest_version(&locator()).await.unwrap_err();
        assert!(err.to_string().contains("UNAUTHORIZED"));
    }

    #[test]
    fn test_reference_trims_slash() {
        assert_eq!(
            OciRegistryClient::reference("xpkg.upbound.io/upbound/", "provider-aws"),
            "xpkg.upbound.io/upbound/provider-aws"
        );
    }
}
