//! Crossplane provider extractor
//!
//! Two layouts are recognised, tried in order:
//!
//! 1. An explicit provider block:
//!    `provider.metadata.name`, `provider.package.version`,
//!    `provider.package.registry`
//! 2. The upbound AWS family globals:
//!    `global.aws_upbound_registry`, `global.aws_upbound_version`

use super::{string_at, Extractor};
use crate::domain::{DependencyRecord, SourceLocator};
use serde_yaml::Value;

/// Image name of the upbound AWS provider family
pub const AWS_PROVIDER_FAMILY: &str = "provider-family-aws";

/// Extracts OCI provider coordinates from crossplane values files
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossplaneExtractor;

impl CrossplaneExtractor {
    fn from_provider_block(doc: &Value) -> Option<DependencyRecord> {
        let provider = doc.get("provider")?;
        let name = string_at(provider.get("metadata")?, "name")?;
        let package = provider.get("package")?;
        let version = string_at(package, "version")?;
        let registry = string_at(package, "registry")?;

        Some(DependencyRecord::new(
            name,
            version,
            SourceLocator::oci(registry, name),
        ))
    }

    fn from_upbound_globals(doc: &Value) -> Option<DependencyRecord> {
        let global = doc.get("global")?;
        let registry = string_at(global, "aws_upbound_registry")?;
        let version = string_at(global, "aws_upbound_version")?;

        Some(DependencyRecord::new(
            AWS_PROVIDER_FAMILY,
            version,
            SourceLocator::oci(registry, AWS_PROVIDER_FAMILY),
        ))
    }
}

impl Extractor for CrossplaneExtractor {
    fn name(&self) -> &'static str {
        "crossplane"
    }

    fn extract(&self, doc: &Value) -> Option<DependencyRecord> {
        Self::from_provider_block(doc).or_else(|| Self::from_upbound_globals(doc))
    }
}
