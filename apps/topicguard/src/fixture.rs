//! Rule-test fixture verification.
//!
//! A fixture annotates each construction the rule must flag with a
//! `ruleid: <rule-id>` comment on the line above it, and each construction
//! it must leave alone with `ok: <rule-id>`. Fixtures are scanned with
//! suppression disabled, so `ok:` lines pass only when the rule genuinely
//! does not fire there. Fixtures are parsed, never compiled: redeclared
//! variables and missing packages are expected.

use crate::error::ConfigError;
use crate::go::SyntaxError;
use crate::lint::{self, ScanOptions};
use crate::markers::{self, Marker};
use crate::models::ParseDiagnostic;
use crate::rule::RULE_ID;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureOutcome {
    pub file: String,
    /// Lines annotated as expected findings.
    pub expected: Vec<usize>,
    /// Expected lines the rule did not flag.
    pub missing: Vec<usize>,
    /// Flagged lines without an annotation.
    pub unexpected: Vec<usize>,
    pub parse_error: Option<ParseDiagnostic>,
}

impl FixtureOutcome {
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.parse_error.is_none()
    }
}

/// Lines that must carry a finding for `rule_id`.
pub fn expected_lines(source: &str, rule_id: &str) -> Vec<usize> {
    let lines: Vec<&str> = source.lines().collect();
    let expected: BTreeSet<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| markers::names_rule(line, Marker::RuleId, rule_id))
        .filter_map(|(idx, _)| markers::following_nonblank(&lines, idx + 1))
        .collect();
    expected.into_iter().collect()
}

/// Compare a fixture's annotations with what the rule reports.
pub fn check_fixture(file: &str, source: &str, opts: &ScanOptions) -> FixtureOutcome {
    let opts = ScanOptions {
        honor_suppressions: false,
        ..opts.clone()
    };
    let expected = expected_lines(source, RULE_ID);
    match lint::scan_source(file, source, &opts) {
        Ok(findings) => {
            let actual: BTreeSet<usize> = findings.iter().map(|f| f.line).collect();
            let want: BTreeSet<usize> = expected.iter().copied().collect();
            FixtureOutcome {
                file: file.to_string(),
                missing: want.difference(&actual).copied().collect(),
                unexpected: actual.difference(&want).copied().collect(),
                expected,
                parse_error: None,
            }
        }
        Err(err) => FixtureOutcome {
            file: file.to_string(),
            missing: Vec::new(),
            unexpected: Vec::new(),
            expected,
            parse_error: Some(parse_failure(file, &err)),
        },
    }
}

fn parse_failure(file: &str, err: &SyntaxError) -> ParseDiagnostic {
    ParseDiagnostic {
        file: file.to_string(),
        line: err.pos.line,
        column: err.pos.column,
        message: err.message.clone(),
    }
}

/// Check every fixture unit; outcomes are sorted by file.
pub fn run_fixtures(
    units: &[PathBuf],
    base: &Path,
    opts: &ScanOptions,
) -> Result<Vec<FixtureOutcome>, ConfigError> {
    let mut outcomes = units
        .par_iter()
        .map(|path| -> Result<_, ConfigError> {
            let file = lint::display_path(path, base);
            debug!(fixture = %file, "checking fixture");
            Ok(match lint::read_unit(path)? {
                Ok(source) => check_fixture(&file, &source, opts),
                Err(message) => FixtureOutcome {
                    parse_error: Some(ParseDiagnostic {
                        file: file.clone(),
                        line: 1,
                        column: 1,
                        message,
                    }),
                    file,
                    expected: Vec::new(),
                    missing: Vec::new(),
                    unexpected: Vec::new(),
                },
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    outcomes.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(outcomes)
}
