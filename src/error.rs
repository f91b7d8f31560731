//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading, scanning or patching manifest files
//! - SourceError: Issues talking to a version source (helm, GitHub, OCI)
//! - ConfigError: Issues with the settings file or CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("failed to parse YAML in {path}: {message}")]
    YamlParseError { path: PathBuf, message: String },

    /// Scan pattern could not be compiled
    #[error("invalid scan pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors related to version source lookups
#[derive(Error, Debug)]
pub enum SourceError {
    /// External tool exited with a failure status
    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    /// External tool could not be spawned
    #[error("failed to run `{program}`: {source}")]
    CommandNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level HTTP failure
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// Non-success HTTP status
    #[error("error fetching latest release for {target}: HTTP {status}")]
    Status { target: String, status: u16 },

    /// Response could not be interpreted
    #[error("invalid response from {source_name} for '{target}': {message}")]
    InvalidResponse {
        source_name: String,
        target: String,
        message: String,
    },

    /// Source answered but offered no usable version
    #[error("no usable versions found for '{target}' in {source_name}")]
    NoVersions { source_name: String, target: String },

    /// Locator handed to a client of the wrong kind
    #[error("{source_name} cannot resolve locator {locator}")]
    LocatorMismatch {
        source_name: String,
        locator: String,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for our schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Unknown scan profile name
    #[error("invalid profile '{value}': expected 'applicationset' or 'crossplane'")]
    InvalidProfile { value: String },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new YamlParseError
    pub fn yaml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::YamlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates a new NoVersions error
    pub fn no_versions(source_name: impl Into<String>, target: impl Into<String>) -> Self {
        SourceError::NoVersions {
            source_name: source_name.into(),
            target: target.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        source_name: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::InvalidResponse {
            source_name: source_name.into(),
            target: target.into(),
            message: message.into(),
        }
    }
}
