//! # grypi-core — Foundational Types for grypi
//!
//! grypi maintains a static "simple repository" package index
//! (`grypi/index.html` plus one page and one metadata ledger per package)
//! and gates releases of package templates in CI. This crate holds the
//! primitives every other crate agrees on.
//!
//! ## Key Design Principles
//!
//! 1. **One normalization rule.** [`PackageName`] carries both the display
//!    name and its PEP 503 normalized form. Index lookups compare normalized
//!    names only.
//!
//! 2. **Two version grammars, one implementation.** [`VersionStyle::Plain`]
//!    is the semantic-version grammar used by the release gate;
//!    [`VersionStyle::Prefixed`] requires a leading `v` and is used for
//!    ledger tags.
//!
//! 3. **No implicit globals.** The CI context ([`GithubContext`]) and the
//!    on-disk layout ([`SiteLayout`]) are values built once at startup and
//!    passed into each operation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `grypi-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests. `expect` is reserved for
//!   compiling constant patterns.

pub mod context;
pub mod error;
pub mod metadata;
pub mod name;
pub mod site;
pub mod version;

pub use context::{GithubContext, GithubEvent, CONTEXT_ENV_VAR};
pub use error::{GrypiError, GrypiResult};
pub use metadata::{json_type, read_json, TemplateCommand, TemplateMetadata, LIST_FIELDS, REQUIRED_FIELDS};
pub use name::{normalize, PackageName};
pub use site::SiteLayout;
pub use version::{is_semver, Version, VersionStyle};
