//! chartbump - chart and provider version reconciler library
//!
//! This library provides the core functionality for keeping versions pinned
//! in YAML manifests in step with their upstream sources:
//! - Argo CD ApplicationSets (Helm chart repositories, GitHub releases)
//! - Crossplane values files (OCI registries)

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod source;
pub mod update;
