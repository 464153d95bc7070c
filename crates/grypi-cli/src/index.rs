//! # Index CLI — maintain the static simple index.
//!
//! ```bash
//! # From a tag push: register the package, or publish a new version.
//! grypi index publish
//!
//! # From an issue created with the "new package" form:
//! grypi index register --issue-body issue.md
//!
//! # Explicit arguments:
//! grypi index update "package name=acme-tool" "new version=1.3.0" \
//!     "link for the new version=git+https://github.com/acme/acme-tool.git@1.3.0"
//! grypi index delete "package name=acme-tool"
//!
//! grypi index list --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use grypi_index::args::{NEW_VERSION, PACKAGE_NAME};
use grypi_index::{IndexArgs, Publication, Registrar};

use crate::GlobalOptions;

/// Index subcommand arguments.
#[derive(Args, Debug)]
pub struct IndexCliArgs {
    #[command(subcommand)]
    pub command: IndexCommand,
}

/// Where an operation's named arguments come from.
#[derive(Args, Debug, Default)]
pub struct ArgumentSource {
    /// File holding the body of an issue created from an issue form.
    #[arg(long)]
    pub issue_body: Option<PathBuf>,

    /// `key=value` arguments; they override values from the issue body.
    #[arg(value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,
}

impl ArgumentSource {
    pub fn resolve(&self) -> Result<IndexArgs> {
        let mut args = match &self.issue_body {
            Some(path) => {
                let body = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read issue body: {}", path.display()))?;
                IndexArgs::from_issue_body(&body)
            }
            None => IndexArgs::new(),
        };
        for (key, value) in IndexArgs::from_pairs(&self.pairs)?.iter() {
            args.set(key, value);
        }
        Ok(args)
    }
}

/// Available index subcommands.
#[derive(Subcommand, Debug)]
pub enum IndexCommand {
    /// Add a new package to the index and create its page.
    Register(ArgumentSource),

    /// Publish a new version of an indexed package.
    Update(ArgumentSource),

    /// Remove a package's page directory and index entry.
    Delete(ArgumentSource),

    /// Register or update the package released by the CI context.
    Publish,

    /// List indexed packages.
    List {
        /// Print the entries as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Execute the index subcommand.
pub fn run_index(args: &IndexCliArgs, opts: &GlobalOptions) -> Result<u8> {
    let registrar = Registrar::new(opts.layout());
    match &args.command {
        IndexCommand::Register(source) => {
            let named = source.resolve()?;
            print!("{named}");
            let entry = registrar.register(&named)?;
            println!("Registered {} {} at {}", entry.name, entry.version, entry.href);
        }
        IndexCommand::Update(source) => {
            let named = source.resolve()?;
            print!("{named}");
            registrar.update(&named)?;
            println!(
                "Updated {} to {}",
                named.require(PACKAGE_NAME)?,
                named.require(NEW_VERSION)?
            );
        }
        IndexCommand::Delete(source) => {
            let named = source.resolve()?;
            print!("{named}");
            let entry = registrar.delete(&named)?;
            println!("Deleted {} ({})", entry.name, entry.href);
        }
        IndexCommand::Publish => {
            let ctx = opts.github_context()?;
            let named = registrar.release_args(&ctx)?;
            print!("{named}");
            let verb = match registrar.publish_release(&named)? {
                Publication::Registered => "Registered",
                Publication::Updated => "Updated",
            };
            println!("{verb} {} {}", ctx.repo_name()?, ctx.tag()?);
        }
        IndexCommand::List { json } => {
            let entries = registrar.load_index()?.entries();
            if *json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    println!("  {:<24} {:<12} {}", entry.name, entry.version, entry.description);
                }
                println!();
                println!("Total: {} packages", entries.len());
            }
        }
    }
    Ok(0)
}
