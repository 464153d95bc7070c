//! Template-check error types.
//!
//! Every check is fatal: the first unmet condition becomes one of these
//! variants and ends the invocation. Variants carry the offending path,
//! key, or pair of disagreeing values.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the template validator and the release gate.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A required file is absent.
    #[error("required file not found: {path}")]
    MissingFile { path: PathBuf },

    /// A required directory is absent.
    #[error("required directory not found: {path}")]
    MissingDirectory { path: PathBuf },

    /// None of the accepted requirements manifests exist.
    #[error("no requirements manifest found; expected one of: {}", join_paths(.candidates))]
    MissingRequirements { candidates: Vec<PathBuf> },

    /// `metadata.json` is not valid JSON.
    #[error("failed to parse JSON at {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// One or more required metadata keys are absent. All of them are listed.
    #[error("some required fields are not present in the metadata.json file: {}", .fields.join(", "))]
    MissingMetadataFields { fields: Vec<String> },

    /// A metadata key holds a value of the wrong JSON type.
    #[error("metadata field '{field}' must be {expected}, found {found}")]
    WrongFieldType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// `command` is a string outside the accepted set.
    #[error("metadata field 'command' must be one of [{allowed}], found {found:?}")]
    InvalidCommand { found: String, allowed: String },

    /// A build-descriptor field could not be extracted.
    #[error("cannot read '{field}' from build descriptor {path}: {reason}")]
    Descriptor {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },

    /// The declared package name disagrees with the repository.
    #[error("package name {declared:?} declared in setup.py does not match repository name {repository:?}")]
    NameMismatch { declared: String, repository: String },

    /// The declared version disagrees with the pushed tag.
    #[error("version {declared:?} declared in setup.py does not match tag {tag:?}")]
    VersionMismatch { declared: String, tag: String },

    /// One or both version strings fail the semantic-version grammar.
    #[error("not a valid semantic version: {}", .values.join(", "))]
    MalformedVersions { values: Vec<String> },

    /// Dependencies could not be found on the package index.
    #[error("dependencies not available on {index_url}: {}", .names.join(", "))]
    UnavailableDependencies { index_url: String, names: Vec<String> },

    /// I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Error from a core primitive.
    #[error(transparent)]
    Core(#[from] grypi_core::GrypiError),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for template checks.
pub type TemplateResult<T> = Result<T, TemplateError>;
