//! # Check CLI — template consistency.
//!
//! ```bash
//! grypi check
//! grypi --template-dir path/to/template check --strict
//! ```

use anyhow::{Context, Result};
use clap::Args;

use grypi_template::{TemplateValidator, ValidationProfile};

use crate::GlobalOptions;

/// Check subcommand arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Also require `template/requirements.txt` and `template/README.md`
    /// inside the nested template directory.
    #[arg(long)]
    pub strict: bool,
}

impl CheckArgs {
    pub fn profile(&self) -> ValidationProfile {
        if self.strict {
            ValidationProfile::Strict
        } else {
            ValidationProfile::Standard
        }
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, opts: &GlobalOptions) -> Result<u8> {
    let layout = opts.layout();
    let validated = TemplateValidator::new(args.profile())
        .validate(&layout.template_dir)
        .with_context(|| format!("template {} is inconsistent", layout.template_dir.display()))?;

    println!("Template {} is consistent.", layout.template_dir.display());
    println!("  display name: {}", validated.metadata.display_name);
    println!("  command:      {}", validated.metadata.command);
    println!("  requirements: {}", validated.files.requirements.display());
    Ok(0)
}
