//! # Package Names
//!
//! PEP 503 name normalization: runs of `-`, `_` and `.` collapse into a
//! single `-`, and the result is lowercased. The normalized form is the
//! unique key of an index entry and the name of the package directory.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{GrypiError, GrypiResult};

fn separator_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_.]+").expect("separator pattern compiles"))
}

/// Normalize a package name according to PEP 503.
///
/// ```
/// assert_eq!(grypi_core::normalize("My_Pkg.Name"), "my-pkg-name");
/// ```
pub fn normalize(name: &str) -> String {
    separator_run().replace_all(name, "-").to_lowercase()
}

/// A package name as supplied by the user, paired with its normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName {
    display: String,
    normalized: String,
}

impl PackageName {
    /// Build a package name, rejecting blank input.
    pub fn new(raw: impl Into<String>) -> GrypiResult<Self> {
        let display = raw.into();
        if display.trim().is_empty() {
            return Err(GrypiError::InvalidPackageName {
                value: display,
                reason: "name is empty".to_string(),
            });
        }
        if display.contains('/') {
            return Err(GrypiError::InvalidPackageName {
                value: display,
                reason: "name must not contain '/'".to_string(),
            });
        }
        let normalized = normalize(&display);
        Ok(Self {
            display,
            normalized,
        })
    }

    /// The name exactly as supplied.
    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// The PEP 503 normalized form.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The relative href of this package's top-level index anchor.
    pub fn index_href(&self) -> String {
        format!("{}/", self.normalized)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
