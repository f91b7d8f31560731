//! Manifest discovery by recursive glob
//!
//! Scanning is lazy: the returned iterator walks the filesystem as it is
//! consumed, and calling [`scan`] again re-lists from scratch.

use crate::domain::Profile;
use crate::error::ManifestError;
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Enumerate files under `root` matching a glob `pattern`
///
/// The root is escaped so glob metacharacters in directory names are taken
/// literally; only the pattern part is interpreted. Entries that cannot be
/// read while walking are dropped.
pub fn scan(root: &Path, pattern: &str) -> Result<impl Iterator<Item = PathBuf>, ManifestError> {
    let escaped_root = Pattern::escape(&root.to_string_lossy());
    let full_pattern = format!(
        "{}/{}",
        escaped_root.trim_end_matches('/'),
        pattern.trim_start_matches('/')
    );

    let paths = glob::glob(&full_pattern).map_err(|e| ManifestError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(paths.filter_map(|entry| match entry {
        Ok(path) if path.is_file() => Some(path),
        Ok(_) => None,
        Err(e) => {
            log::debug!("skipping unreadable path {}: {}", e.path().display(), e.error());
            None
        }
    }))
}

/// Enumerate the candidate manifests for a profile
pub fn scan_profile(
    root: &Path,
    profile: Profile,
    pattern: Option<&str>,
) -> Result<impl Iterator<Item = PathBuf>, ManifestError> {
    scan(root, pattern.unwrap_or(profile.default_pattern()))
}
