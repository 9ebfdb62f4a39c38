//! CLI argument parsing via `clap`.

use crate::models::{OutputMode, Severity};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "topicguard",
    version,
    about = "Flag event-log filter queries that trust topics without pinning the contract address",
    long_about = "Topicguard scans Go sources for event-log filter queries (go-ethereum FilterQuery literals) that constrain Topics but leave Addresses empty. Such a filter accepts a matching event emitted by any contract.\n\nConfiguration precedence: CLI > topicguard.toml > defaults.",
    after_help = "Examples:\n  topicguard scan\n  topicguard scan ./bridge ./watcher --output json\n  topicguard scan --severity error --fail-on-parse-error\n  topicguard test fixtures/",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current topicguard version."
    )]
    Version,
    /// Describe the rule
    #[command(
        about = "List rules",
        long_about = "Print the rule id, severity and description."
    )]
    Rules {
        #[arg(long, value_enum, help = "Output mode: human|json (default: human)")]
        output: Option<OutputMode>,
    },
    /// Scan Go sources
    #[command(
        about = "Scan Go sources",
        long_about = "Scan files and directories for filter queries that set topics without an address. Directories are expanded with the configured include/exclude globs. Units that fail to parse are reported and skipped.",
        after_help = "Examples:\n  topicguard scan\n  topicguard scan pkg/ cmd/relayer/main.go --output json"
    )]
    Scan {
        #[arg(default_value = ".", help = "Files or directories to scan")]
        paths: Vec<PathBuf>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<PathBuf>,
        #[arg(long, help = "Config file (default: topicguard.toml|yaml in the repo root)")]
        config: Option<PathBuf>,
        #[arg(long, value_enum, help = "Output mode: human|json (default: human)")]
        output: Option<OutputMode>,
        #[arg(long, value_enum, help = "Severity attached to findings (default: warning)")]
        severity: Option<Severity>,
        #[arg(long, action = ArgAction::SetTrue, help = "Exit non-zero when a unit fails to parse")]
        fail_on_parse_error: bool,
    },
    /// Verify annotated rule fixtures
    #[command(
        about = "Verify rule fixtures",
        long_about = "Check annotated fixtures: every line after a `ruleid:` comment must be flagged and nothing else may be. `ok:` comments do not suppress findings here.",
        after_help = "Examples:\n  topicguard test fixtures/\n  topicguard test fixtures/filter.go --output json"
    )]
    Test {
        #[arg(required = true, help = "Fixture files or directories")]
        paths: Vec<PathBuf>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<PathBuf>,
        #[arg(long, help = "Config file (default: topicguard.toml|yaml in the repo root)")]
        config: Option<PathBuf>,
        #[arg(long, value_enum, help = "Output mode: human|json (default: human)")]
        output: Option<OutputMode>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["topicguard", "scan"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.cmd {
            Commands::Scan {
                paths,
                output,
                severity,
                fail_on_parse_error,
                ..
            } => {
                assert_eq!(paths, vec![PathBuf::from(".")]);
                assert!(output.is_none());
                assert!(severity.is_none());
                assert!(!fail_on_parse_error);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_flags_and_global_verbosity() {
        let cli = Cli::try_parse_from([
            "topicguard",
            "scan",
            "pkg",
            "cmd/main.go",
            "--output",
            "json",
            "--severity",
            "error",
            "--fail-on-parse-error",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Commands::Scan {
                paths,
                output,
                severity,
                fail_on_parse_error,
                ..
            } => {
                assert_eq!(paths.len(), 2);
                assert_eq!(output, Some(OutputMode::Json));
                assert_eq!(severity, Some(Severity::Error));
                assert!(fail_on_parse_error);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_test_requires_paths() {
        assert!(Cli::try_parse_from(["topicguard", "test"]).is_err());
        assert!(Cli::try_parse_from(["topicguard", "test", "fixtures"]).is_ok());
        assert!(Cli::try_parse_from(["topicguard", "scan", "--output", "xml"]).is_err());
    }
}
