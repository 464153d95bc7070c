//! # Dependency Probe
//!
//! Asks a package index whether each declared dependency is installable,
//! using `pip index versions <name> --index-url <url>`.
//!
//! A dependency is available when stdout contains `Available versions`
//! and stderr does not contain `ERROR`. The exit code is ignored; pip
//! prints warnings about the experimental `index` command on stderr even
//! when the lookup succeeds.

use crate::error::{TemplateError, TemplateResult};
use crate::runner::{CommandOutput, CommandRunner};

const AVAILABLE_MARKER: &str = "Available versions";
const ERROR_MARKER: &str = "ERROR";

/// Whether captured `pip index versions` output reports the package.
pub fn reports_available(output: &CommandOutput) -> bool {
    output.stdout.contains(AVAILABLE_MARKER) && !output.stderr.contains(ERROR_MARKER)
}

/// Queries one package index for dependency availability.
pub struct DependencyProbe<R> {
    runner: R,
    index_url: String,
}

impl<R: CommandRunner> DependencyProbe<R> {
    pub fn new(runner: R, index_url: impl Into<String>) -> Self {
        Self {
            runner,
            index_url: index_url.into(),
        }
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    /// Query one dependency. A command that cannot be spawned counts as
    /// unavailable.
    pub fn is_available(&self, dependency: &str) -> bool {
        let args = ["index", "versions", dependency, "--index-url", self.index_url.as_str()];
        match self.runner.run("pip", &args) {
            Ok(output) => {
                let found = reports_available(&output);
                tracing::debug!(dependency, found, "queried package index");
                found
            }
            Err(e) => {
                tracing::warn!(dependency, error = %e, "could not run pip");
                false
            }
        }
    }

    /// Query every dependency and report all unavailable ones together.
    pub fn check_all(&self, dependencies: &[&str]) -> TemplateResult<()> {
        let missing: Vec<String> = dependencies
            .iter()
            .filter(|dep| !self.is_available(dep))
            .map(|dep| dep.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TemplateError::UnavailableDependencies {
                index_url: self.index_url.clone(),
                names: missing,
            })
        }
    }
}
