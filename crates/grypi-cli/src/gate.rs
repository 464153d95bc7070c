//! # Gate CLI — release gate for a pushed tag.
//!
//! ```bash
//! GITHUB_CONTEXT='${{ toJson(github) }}' grypi gate
//! grypi gate --dependency-index https://pypi.example.org/simple
//! ```
//!
//! When the tag is rejected but is a valid semantic version it is
//! deleted locally and on the remote, and instructions for removing it
//! by hand are printed before the error.

use anyhow::Result;
use clap::Args;

use grypi_template::{ReleaseGate, SystemRunner, TemplateValidator, ValidationProfile};

use crate::GlobalOptions;

/// Gate subcommand arguments.
#[derive(Args, Debug)]
pub struct GateArgs {
    /// Apply the strict template profile.
    #[arg(long)]
    pub strict: bool,

    /// Leave rejected tags in place.
    #[arg(long)]
    pub no_tag_cleanup: bool,

    /// Remote to delete rejected tags from.
    #[arg(long, default_value = grypi_template::gate::DEFAULT_REMOTE)]
    pub remote: String,

    /// Package index URL every declared dependency must be available on.
    #[arg(long)]
    pub dependency_index: Option<String>,
}

/// Execute the gate subcommand.
pub fn run_gate(args: &GateArgs, opts: &GlobalOptions) -> Result<u8> {
    let layout = opts.layout();
    let ctx = opts.github_context()?;
    let profile = if args.strict {
        ValidationProfile::Strict
    } else {
        ValidationProfile::Standard
    };

    let gate = ReleaseGate::new(TemplateValidator::new(profile), SystemRunner)
        .delete_rejected_tags(!args.no_tag_cleanup)
        .remote(args.remote.as_str())
        .dependency_index(args.dependency_index.clone());

    match gate.check(&layout.template_dir, &ctx) {
        Ok(check) => {
            println!(
                "Release {} {} accepted.",
                check.descriptor.name, check.version
            );
            Ok(0)
        }
        Err(rejection) => {
            if let Some(cleanup) = &rejection.cleanup {
                println!("{}", cleanup.manual_hint());
            }
            Err(rejection.into())
        }
    }
}
