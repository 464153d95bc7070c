//! # Ledger CLI — append the released metadata to the package ledger.
//!
//! ```bash
//! GITHUB_CONTEXT='${{ toJson(github) }}' grypi ledger
//! ```
//!
//! Tags must look like `v1.2.3` unless `--plain` is given. Any other tag
//! makes a dry run: the ledger is still written, then the command fails.

use anyhow::Result;
use clap::Args;

use grypi_core::VersionStyle;
use grypi_index::LedgerUpdater;

use crate::GlobalOptions;

/// Ledger subcommand arguments.
#[derive(Args, Debug)]
pub struct LedgerArgs {
    /// Accept release tags without the leading `v`.
    #[arg(long)]
    pub plain: bool,
}

/// Execute the ledger subcommand.
pub fn run_ledger(args: &LedgerArgs, opts: &GlobalOptions) -> Result<u8> {
    let ctx = opts.github_context()?;
    let style = if args.plain {
        VersionStyle::Plain
    } else {
        VersionStyle::Prefixed
    };
    let update = LedgerUpdater::new(opts.layout())
        .with_style(style)
        .update(&ctx)?;

    println!(
        "Ledger for {} now lists {} version(s); written to {}",
        ctx.repo_name()?,
        update.records.len(),
        update.written_to.display()
    );
    if update.seeded {
        println!("  (no previous ledger found; started a new one)");
    }
    Ok(0)
}
