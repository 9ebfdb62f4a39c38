//! Shared data models for scan results and the filter-query signature.

pub mod signature;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
/// Severity attached to every finding of a run.
pub enum Severity {
    #[default]
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
/// Report rendering mode.
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A reported filter query that constrains topics but not the address.
pub struct Finding {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A unit that could not be parsed. Reported apart from findings.
pub struct ParseDiagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Aggregated counts used by printers and the exit code.
pub struct Summary {
    pub findings: usize,
    pub parse_errors: usize,
    pub files: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Scan results container.
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub parse_errors: Vec<ParseDiagnostic>,
    pub summary: Summary,
}

impl ScanReport {
    /// 1 when anything was found (or a parse error occurred and those are
    /// fatal), otherwise 0.
    pub fn exit_code(&self, fail_on_parse_error: bool) -> i32 {
        let failed = !self.findings.is_empty()
            || (fail_on_parse_error && !self.parse_errors.is_empty());
        i32::from(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic() -> ParseDiagnostic {
        ParseDiagnostic {
            file: "bad.go".into(),
            line: 1,
            column: 1,
            message: "unexpected `)`".into(),
        }
    }

    #[test]
    fn test_exit_code_ignores_parse_errors_unless_fatal() {
        let report = ScanReport {
            parse_errors: vec![diagnostic()],
            ..Default::default()
        };
        assert_eq!(report.exit_code(false), 0);
        assert_eq!(report.exit_code(true), 1);
        assert_eq!(ScanReport::default().exit_code(true), 0);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
