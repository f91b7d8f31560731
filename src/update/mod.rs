//! Update decision logic
//!
//! This module provides:
//! - Semantic version parsing with `v`-prefix tolerance
//! - Precedence ordering and release-candidate filtering for tag lists
//! - The comparator that turns (current, latest) into an update decision

mod version;

pub use version::{compare_precedence, is_release_candidate, latest_of, parse_version};

use crate::domain::UpdateDecision;
use std::cmp::Ordering;

/// Decide whether `latest` should replace `current`
///
/// Returns `Some(latest)` only when both strings parse and `latest` is
/// strictly greater under semver precedence. Equal, older, missing or
/// unparsable input all yield `None`; callers leave the manifest alone.
pub fn compare(current: &str, latest: Option<&str>) -> UpdateDecision {
    let latest = latest?;
    let current_version = parse_version(current)?;
    let latest_version = parse_version(latest)?;

    match compare_precedence(&latest_version, &current_version) {
        Ordering::Greater => Some(latest.to_string()),
        _ => None,
    }
}
