//! Core domain models for chartbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Scan profiles for the manifest shapes we understand
//! - Dependency records and the source locators they point at
//! - Per-manifest reconciliation outcomes
//! - Summary and report structures

mod dependency;
mod profile;
mod summary;
mod update_result;

pub use dependency::{DependencyRecord, SourceKind, SourceLocator};
pub use profile::Profile;
pub use summary::{ManifestReport, ReconcileSummary};
pub use update_result::{ManifestOutcome, SkipReason, UpdateDecision};
