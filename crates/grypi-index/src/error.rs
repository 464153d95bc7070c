//! Index and ledger error types.
//!
//! Conflicts (already registered, not registered) are checked before any
//! file is touched. I/O and parse errors carry the path they occurred at.

use std::path::PathBuf;

use thiserror::Error;

/// A markup document could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed markup at byte {offset}: {reason}")]
pub struct MarkupError {
    pub offset: usize,
    pub reason: String,
}

/// Errors raised by the index registrar.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A required argument key is absent.
    #[error("Couldn't find argument {name}")]
    MissingArgument { name: String },

    /// A required argument is present but blank.
    #[error("Argument {name} is empty. Please specify it")]
    EmptyArgument { name: String },

    /// A `key=value` argument has no `=`.
    #[error("malformed argument {raw:?}: expected key=value")]
    MalformedArgument { raw: String },

    /// Registration of a package whose normalized name is already indexed.
    #[error("Package {package} seems to already exists")]
    AlreadyRegistered { package: String },

    /// Update or deletion of a package that is not indexed.
    #[error("Package {package} seems to not exists")]
    NotRegistered { package: String },

    /// An anchor lacks the expected child structure.
    #[error("anchor {href:?} is malformed: {reason}")]
    AnchorShape { href: String, reason: String },

    /// A package page lacks the latest-version element.
    #[error("package page {path} is malformed: {reason}")]
    PageShape { path: PathBuf, reason: String },

    /// A document on disk is not well-formed markup.
    #[error("failed to parse {path}: {source}")]
    Markup {
        path: PathBuf,
        source: MarkupError,
    },

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

/// Result type alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised by the metadata ledger updater.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The tag is not a release version. Raised after the ledger was written.
    #[error("Running dry. Not copying the files to the definitive place. Version name not valid: {tag}.")]
    DryRun { tag: String },

    /// The template metadata is not a JSON object.
    #[error("metadata at {path} must be a JSON object, found {found}")]
    NotAnObject { path: PathBuf, found: &'static str },

    /// The ledger is neither a list nor a legacy version map.
    #[error("ledger at {path} must be a list or a map of versions, found {found}")]
    UnexpectedShape { path: PathBuf, found: &'static str },

    /// A legacy ledger entry is not a JSON object.
    #[error("ledger at {path}: entry for version {version:?} is not an object")]
    LegacyRecord { path: PathBuf, version: String },

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

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
