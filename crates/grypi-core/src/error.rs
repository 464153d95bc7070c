//! # Error Types
//!
//! Errors raised while building the core primitives: names, versions,
//! CI context, and JSON documents read from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for grypi primitives.
#[derive(Error, Debug)]
pub enum GrypiError {
    /// A version string does not satisfy the required grammar.
    #[error("version {value:?} is not a valid semantic version{}", prefix_hint(.prefixed))]
    InvalidVersion {
        /// The rejected input.
        value: String,
        /// Whether the leading-`v` grammar was applied.
        prefixed: bool,
    },

    /// A package name is unusable as an index key.
    #[error("invalid package name {value:?}: {reason}")]
    InvalidPackageName { value: String, reason: String },

    /// The CI context environment variable is not set.
    #[error("environment variable {var} is not set")]
    MissingContext { var: String },

    /// The CI context is not valid JSON or lacks required keys.
    #[error("failed to parse CI context: {source}")]
    ContextParse { source: serde_json::Error },

    /// A CI context field is present but unusable.
    #[error("CI context field '{field}' is invalid: {reason}")]
    ContextField { field: String, reason: String },

    /// A JSON document on disk failed to parse.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn prefix_hint(prefixed: &bool) -> &'static str {
    if *prefixed {
        " (expected a leading 'v')"
    } else {
        ""
    }
}

/// Result type alias for core operations.
pub type GrypiResult<T> = Result<T, GrypiError>;
