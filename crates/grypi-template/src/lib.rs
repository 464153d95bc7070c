//! # grypi-template — Template Consistency and Release Gate
//!
//! Two checks run by CI on a package template repository:
//!
//! - [`TemplateValidator`] asserts the template tree and its
//!   `metadata.json` are well formed. Read-only.
//! - [`ReleaseGate`] additionally ties the `setup.py` declaration to the
//!   repository and the pushed tag, and removes the tag when it was
//!   pushed by mistake.
//!
//! Both fail fast: the first unmet condition is returned and nothing is
//! retried.
//!
//! ## Crate Policy
//!
//! - External programs only run through [`CommandRunner`].
//! - No `.unwrap()` outside tests.

pub mod descriptor;
pub mod error;
pub mod gate;
pub mod probe;
pub mod runner;
pub mod schema;
pub mod structure;
pub mod validate;

pub use descriptor::{extract_naive, BuildDescriptor};
pub use error::{TemplateError, TemplateResult};
pub use gate::{compare_release, CleanupStep, GateRejection, ReleaseCheck, ReleaseGate, TagCleanup};
pub use probe::DependencyProbe;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use structure::{ValidationProfile, REQUIREMENTS_CANDIDATES};
pub use validate::{TemplateValidator, ValidatedTemplate};
