//! Manifest discovery, extraction and patching
//!
//! This module provides functionality to:
//! - Scan a directory tree for candidate manifests
//! - Extract dependency records from differently-shaped YAML documents
//! - Patch version strings in place without re-serializing YAML

mod application_set;
mod crossplane;
mod patcher;
mod scanner;

pub use application_set::ApplicationSetExtractor;
pub use crossplane::{CrossplaneExtractor, AWS_PROVIDER_FAMILY};
pub use patcher::{
    read_manifest, replace_in_lines, write_manifest, PatchResult, Patcher, SubstringPatcher,
};
pub use scanner::{scan, scan_profile};

use crate::domain::{DependencyRecord, Profile};
use crate::error::ManifestError;
use serde_yaml::Value;
use std::path::Path;

/// Trait for pulling a dependency record out of a parsed manifest
///
/// Extraction is total: any missing key, wrong-typed field or unexpected
/// layout yields `None`.
pub trait Extractor {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extract a dependency record, or `None` if the document has another shape
    fn extract(&self, doc: &Value) -> Option<DependencyRecord>;
}

/// Get the extractor for a scan profile
pub fn get_extractor(profile: Profile) -> Box<dyn Extractor + Send + Sync> {
    match profile {
        Profile::ApplicationSet => Box::new(ApplicationSetExtractor),
        Profile::Crossplane => Box::new(CrossplaneExtractor),
    }
}

/// Read and parse a manifest into a generic YAML value
pub fn load_document(path: &Path) -> Result<Value, ManifestError> {
    let content = read_manifest(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| ManifestError::yaml_parse_error(path, e.to_string()))
}

/// Returns the top-level `kind` of a document, if it is a string
pub fn document_kind(doc: &Value) -> Option<&str> {
    doc.get("kind").and_then(Value::as_str)
}

/// Look up a string-valued key in a mapping
fn string_at<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
