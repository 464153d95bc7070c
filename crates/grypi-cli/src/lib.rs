//! # grypi-cli — CLI for grypi
//!
//! Provides the `grypi` command run by the template release workflow.
//!
//! ## Subcommands
//!
//! - `grypi check` — Template structure and `metadata.json` schema.
//! - `grypi gate` — Release gate: template check plus name/version/tag
//!   agreement, deleting mistaken tags.
//! - `grypi index` — Register, update, delete or publish packages in the
//!   static simple index.
//! - `grypi ledger` — Append the released metadata to the package ledger.
//!
//! The workflow runs them in that order:
//!
//! ```bash
//! grypi gate
//! grypi ledger
//! grypi index publish
//! ```

pub mod check;
pub mod gate;
pub mod index;
pub mod ledger;

use std::path::PathBuf;

use anyhow::{Context, Result};

use grypi_core::{GithubContext, SiteLayout, CONTEXT_ENV_VAR};

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub template_dir: Option<PathBuf>,
    pub index_root: Option<PathBuf>,
    /// CI context JSON; falls back to the `GITHUB_CONTEXT` variable.
    pub context: Option<String>,
}

impl GlobalOptions {
    pub fn layout(&self) -> SiteLayout {
        let defaults = SiteLayout::default();
        SiteLayout::new(
            self.template_dir.clone().unwrap_or(defaults.template_dir),
            self.index_root.clone().unwrap_or(defaults.index_root),
        )
    }

    pub fn github_context(&self) -> Result<GithubContext> {
        match &self.context {
            Some(json) => GithubContext::from_json(json).context("invalid --context"),
            None => GithubContext::from_env()
                .with_context(|| format!("reading CI context from {CONTEXT_ENV_VAR}")),
        }
    }
}
