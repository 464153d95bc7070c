//! # grypi CLI entry point
//!
//! Parses command-line arguments, initializes logging, and dispatches to
//! the subcommand handlers in the `grypi_cli` library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use grypi_cli::check::{run_check, CheckArgs};
use grypi_cli::gate::{run_gate, GateArgs};
use grypi_cli::index::{run_index, IndexCliArgs};
use grypi_cli::ledger::{run_ledger, LedgerArgs};
use grypi_cli::GlobalOptions;

/// grypi — package template checks and static simple-index maintenance.
#[derive(Parser, Debug)]
#[command(name = "grypi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Template directory [default: template].
    #[arg(long, global = true)]
    template_dir: Option<PathBuf>,

    /// Root of the static index [default: grypi].
    #[arg(long, global = true)]
    index_root: Option<PathBuf>,

    /// CI context as JSON. Defaults to the GITHUB_CONTEXT environment variable.
    #[arg(long, global = true)]
    context: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the template structure and metadata.json.
    Check(CheckArgs),

    /// Release gate: check the template against the repository and tag.
    Gate(GateArgs),

    /// Register, update, delete or publish packages in the index.
    Index(IndexCliArgs),

    /// Append the released metadata to the package ledger.
    Ledger(LedgerArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let opts = GlobalOptions {
        template_dir: cli.template_dir,
        index_root: cli.index_root,
        context: cli.context,
    };

    let result = match cli.command {
        Commands::Check(args) => run_check(&args, &opts),
        Commands::Gate(args) => run_gate(&args, &opts),
        Commands::Index(args) => run_index(&args, &opts),
        Commands::Ledger(args) => run_ledger(&args, &opts),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grypi_cli::index::IndexCommand;

    #[test]
    fn cli_parse_check_defaults() {
        let cli = Cli::try_parse_from(["grypi", "check"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.template_dir.is_none());
        if let Commands::Check(args) = cli.command {
            assert!(!args.strict);
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "grypi",
            "check",
            "--strict",
            "--template-dir",
            "pkg",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.template_dir, Some(PathBuf::from("pkg")));
        assert!(matches!(cli.command, Commands::Check(CheckArgs { strict: true })));
    }

    #[test]
    fn cli_parse_gate_options() {
        let cli = Cli::try_parse_from([
            "grypi",
            "gate",
            "--no-tag-cleanup",
            "--remote",
            "upstream",
            "--dependency-index",
            "https://pypi.example.org/simple",
        ])
        .unwrap();
        if let Commands::Gate(args) = cli.command {
            assert!(args.no_tag_cleanup);
            assert_eq!(args.remote, "upstream");
            assert_eq!(args.dependency_index.as_deref(), Some("https://pypi.example.org/simple"));
        } else {
            panic!("expected gate");
        }
    }

    #[test]
    fn cli_parse_gate_default_remote() {
        let cli = Cli::try_parse_from(["grypi", "gate"]).unwrap();
        if let Commands::Gate(args) = cli.command {
            assert_eq!(args.remote, "origin");
            assert!(!args.no_tag_cleanup);
            assert!(args.dependency_index.is_none());
        } else {
            panic!("expected gate");
        }
    }

    #[test]
    fn cli_parse_index_register_pairs() {
        let cli = Cli::try_parse_from([
            "grypi",
            "index",
            "register",
            "package name=acme",
            "version=1.0.0",
        ])
        .unwrap();
        if let Commands::Index(args) = cli.command {
            match args.command {
                IndexCommand::Register(source) => {
                    assert_eq!(source.pairs, vec!["package name=acme", "version=1.0.0"]);
                    assert!(source.issue_body.is_none());
                }
                other => panic!("expected register, got {other:?}"),
            }
        } else {
            panic!("expected index");
        }
    }

    #[test]
    fn cli_parse_index_issue_body() {
        let cli =
            Cli::try_parse_from(["grypi", "index", "delete", "--issue-body", "issue.md"]).unwrap();
        if let Commands::Index(args) = cli.command {
            assert!(matches!(
                args.command,
                IndexCommand::Delete(ref s) if s.issue_body == Some(PathBuf::from("issue.md"))
            ));
        } else {
            panic!("expected index");
        }
    }

    #[test]
    fn cli_parse_index_publish_and_list() {
        let cli = Cli::try_parse_from(["grypi", "index", "publish"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Index(ref a) if matches!(a.command, IndexCommand::Publish)
        ));
        let cli = Cli::try_parse_from(["grypi", "index", "list", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Index(ref a) if matches!(a.command, IndexCommand::List { json: true })
        ));
    }

    #[test]
    fn cli_parse_ledger_with_context() {
        let cli = Cli::try_parse_from([
            "grypi",
            "--context",
            r#"{"repository":"a/b","event":{"ref":"refs/tags/v1.0.0"}}"#,
            "ledger",
            "--plain",
        ])
        .unwrap();
        assert!(cli.context.is_some());
        assert!(matches!(cli.command, Commands::Ledger(LedgerArgs { plain: true })));
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["grypi", "serve"]).is_err());
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["grypi"]).is_err());
    }
}
