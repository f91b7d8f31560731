//! Semantic version parsing and ordering
//!
//! Version strings in manifests and release feeds often carry a leading `v`
//! (`v0.33.0`), so one is stripped before strict semver parsing. Anything
//! that is not `major.minor.patch[-pre][+build]` after that is rejected.

use semver::{BuildMetadata, Version};
use std::cmp::Ordering;

/// Marker that identifies release-candidate registry tags
const RELEASE_CANDIDATE_MARKER: &str = "-rc.";

/// Parse a version string, tolerating a single leading `v`
pub fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('v')
        .or_else(|| raw.strip_prefix('V'))
        .unwrap_or(raw);
    Version::parse(raw).ok()
}

/// Compare two versions by semver precedence
///
/// Build metadata does not take part in precedence, so it is cleared before
/// comparing. A release ranks above any pre-release of the same triple.
pub fn compare_precedence(a: &Version, b: &Version) -> Ordering {
    if a.build.is_empty() && b.build.is_empty() {
        return a.cmp(b);
    }
    let mut a = a.clone();
    let mut b = b.clone();
    a.build = BuildMetadata::EMPTY;
    b.build = BuildMetadata::EMPTY;
    a.cmp(&b)
}

/// Returns true if a registry tag is a release candidate
pub fn is_release_candidate(tag: &str) -> bool {
    tag.contains(RELEASE_CANDIDATE_MARKER)
}

/// Pick the highest non-RC version from a list of registry tags
///
/// Tags that do not parse (`latest`, digests, ...) are dropped. The result is
/// always rendered with a `v` prefix. Returns `None` when nothing is left.
pub fn latest_of<'a, I>(tags: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && !is_release_candidate(tag))
        .filter_map(parse_version)
        .max_by(compare_precedence)
        .map(|v| format!("v{}", v))
}
