//! Topicguard CLI binary entry point.
//! Delegates to the library for scanning and fixture checks and prints results.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use topicguard::cli::{Cli, Commands};
use topicguard::config::{self, Effective};
use topicguard::error::Error;
use topicguard::lint::{self, ScanOptions};
use topicguard::logging::{self, LogConfig};
use topicguard::models::OutputMode;
use topicguard::{fixture, output, rule, utils};

fn main() {
    let cli = Cli::parse();
    let log_config =
        LogConfig::from_verbosity(cli.verbose).with_ansi(std::env::var_os("NO_COLOR").is_none());
    if let Err(err) = logging::init_logging(&log_config) {
        eprintln!("{} logging disabled: {}", utils::note_prefix(), err);
    }
    match run(cli.cmd) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{} {}", utils::error_prefix(), err);
            process::exit(2);
        }
    }
}

/// Friendly note if no config file was found.
fn note_defaults(eff: &Effective) {
    if eff.config_path.is_none() && eff.output != OutputMode::Json {
        eprintln!(
            "{} No topicguard.toml found; using defaults.",
            utils::note_prefix()
        );
    }
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn run(cmd: Commands) -> Result<i32, Error> {
    match cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Commands::Rules {
            output: output_mode,
        } => {
            let eff = config::resolve_effective(None, None, output_mode, None, None)?;
            let rules = [rule::describe(&eff.signature, eff.severity)];
            output::print_rules(&rules, eff.output)?;
            Ok(0)
        }
        Commands::Scan {
            paths,
            repo_root,
            config: config_file,
            output: output_mode,
            severity,
            fail_on_parse_error,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                config_file.as_deref(),
                output_mode,
                severity,
                fail_on_parse_error.then_some(true),
            )?;
            note_defaults(&eff);
            let units = lint::collect_units(&paths, &eff.include, &eff.exclude)?;
            if units.is_empty() && eff.output != OutputMode::Json {
                eprintln!(
                    "{} No Go files matched [{}].",
                    utils::info_prefix(),
                    eff.include.join(", ")
                );
            }
            let opts = ScanOptions::from_effective(&eff);
            let report = lint::run_scan(&units, &working_dir(), &opts)?;
            output::print_scan(&report, eff.output)?;
            Ok(report.exit_code(eff.fail_on_parse_error))
        }
        Commands::Test {
            paths,
            repo_root,
            config: config_file,
            output: output_mode,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                config_file.as_deref(),
                output_mode,
                None,
                None,
            )?;
            let units = lint::collect_units(&paths, &eff.include, &[])?;
            let opts = ScanOptions::from_effective(&eff);
            let outcomes = fixture::run_fixtures(&units, &working_dir(), &opts)?;
            output::print_fixtures(&outcomes, eff.output)?;
            Ok(i32::from(outcomes.iter().any(|o| !o.passed())))
        }
    }
}
