//! Format-preserving version patching
//!
//! This module provides:
//! - The Patcher trait the reconciler writes updates through
//! - SubstringPatcher, a blind line-by-line find-and-replace
//! - Dry-run support (no actual file modifications)
//!
//! Substitution is textual on purpose: comments, key order, quoting and line
//! endings survive untouched. The flip side is that any other token
//! containing the old version string is rewritten as well.

use crate::error::ManifestError;
use std::fs;
use std::path::Path;

/// Result of patching a manifest file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchResult {
    /// Number of substring occurrences replaced
    pub replacements: usize,
    /// Number of lines that contained at least one occurrence
    pub lines_changed: usize,
    /// Whether the file was actually written
    pub file_modified: bool,
}

impl PatchResult {
    /// Returns true if anything matched
    pub fn has_changes(&self) -> bool {
        self.replacements > 0
    }
}

/// Applies a version change to a manifest on disk
pub trait Patcher {
    /// Replace `old` with `new` in the file at `path`
    ///
    /// `new == None` is a no-op and never touches the file.
    fn apply(&self, path: &Path, old: &str, new: Option<&str>)
        -> Result<PatchResult, ManifestError>;
}

/// Blind substring substitution over every line of a file
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringPatcher {
    dry_run: bool,
}

impl SubstringPatcher {
    /// Create a new SubstringPatcher
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl Patcher for SubstringPatcher {
    fn apply(
        &self,
        path: &Path,
        old: &str,
        new: Option<&str>,
    ) -> Result<PatchResult, ManifestError> {
        let Some(new) = new else {
            return Ok(PatchResult::default());
        };
        if old.is_empty() {
            return Ok(PatchResult::default());
        }

        let content = read_manifest(path)?;
        let (patched, mut result) = replace_in_lines(&content, old, new);

        if result.has_changes() && !self.dry_run && patched != content {
            write_manifest(path, &patched)?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

/// Replace every occurrence of `old` on every line, keeping line terminators
pub fn replace_in_lines(content: &str, old: &str, new: &str) -> (String, PatchResult) {
    let mut result = PatchResult::default();
    let mut out = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        let hits = line.matches(old).count();
        if hits == 0 {
            out.push_str(line);
            continue;
        }
        result.replacements += hits;
        result.lines_changed += 1;
        out.push_str(&line.replace(old, new));
    }

    (out, result)
}

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
