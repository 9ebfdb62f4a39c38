//! Scan runner: unit discovery, per-unit scanning, and report assembly.
//!
//! Units are independent, so they are read and scanned in parallel; the
//! report is sorted afterwards (file, line, column) so repeated runs over
//! unchanged input print identical output. A unit that fails to parse is
//! reported as a diagnostic and skipped; a path that cannot be found or read
//! aborts the run with a [`ConfigError`].

use crate::config::Effective;
use crate::emit;
use crate::error::ConfigError;
use crate::go::{self, SyntaxError};
use crate::models::signature::FilterSignature;
use crate::models::{Finding, ParseDiagnostic, ScanReport, Severity, Summary};
use crate::scanner;
use glob::Pattern;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
/// Settings shared by every unit of a run.
pub struct ScanOptions {
    pub signature: FilterSignature,
    pub severity: Severity,
    /// Honor `ok:` markers. Fixture verification turns this off.
    pub honor_suppressions: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            signature: FilterSignature::default(),
            severity: Severity::default(),
            honor_suppressions: true,
        }
    }
}

impl ScanOptions {
    pub fn from_effective(eff: &Effective) -> Self {
        Self {
            signature: eff.signature.clone(),
            severity: eff.severity,
            honor_suppressions: true,
        }
    }
}

/// Scan one unit's source text.
pub fn scan_source(
    file: &str,
    source: &str,
    opts: &ScanOptions,
) -> Result<Vec<Finding>, SyntaxError> {
    let unit = go::parse_unit(source)?;
    let sites = scanner::sites(&unit, &opts.signature);
    Ok(emit::emit_findings(file, unit.source(), sites, opts))
}

/// Scan one unit, turning a syntax error into a diagnostic for that unit.
pub fn scan_unit(
    file: &str,
    source: &str,
    opts: &ScanOptions,
) -> (Vec<Finding>, Option<ParseDiagnostic>) {
    match scan_source(file, source, opts) {
        Ok(findings) => (findings, None),
        Err(err) => {
            warn!(unit = file, error = %err, "skipping unit that failed to parse");
            (Vec::new(), Some(diagnostic(file, &err)))
        }
    }
}

fn diagnostic(file: &str, err: &SyntaxError) -> ParseDiagnostic {
    ParseDiagnostic {
        file: file.to_string(),
        line: err.pos.line,
        column: err.pos.column,
        message: err.message.clone(),
    }
}

/// Expand input paths into the sorted list of units to scan.
///
/// Files are taken as given. Directories are expanded with the `include`
/// globs, minus anything matching an `exclude` glob relative to that
/// directory.
pub fn collect_units(
    inputs: &[PathBuf],
    include: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>, ConfigError> {
    let excludes = exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ConfigError::BadPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut units: Vec<PathBuf> = Vec::new();
    for input in inputs {
        if !input.exists() {
            return Err(ConfigError::PathNotFound {
                path: input.clone(),
            });
        }
        if input.is_file() {
            units.push(input.clone());
            continue;
        }
        let base = Pattern::escape(&input.to_string_lossy());
        for pat in include {
            let pattern = Path::new(&base).join(pat).to_string_lossy().to_string();
            let entries = glob::glob(&pattern).map_err(|source| ConfigError::BadPattern {
                pattern: pat.clone(),
                source,
            })?;
            for entry in entries {
                let path = match entry {
                    Ok(p) => p,
                    Err(err) => {
                        debug!(error = %err, "skipping unreadable glob entry");
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                let rel = path.strip_prefix(input).unwrap_or(&path);
                if excludes.iter().any(|ex| ex.matches_path(rel)) {
                    debug!(path = %path.display(), "excluded");
                    continue;
                }
                units.push(path);
            }
        }
    }
    units.sort();
    units.dedup();
    Ok(units)
}

/// Path shown in reports: relative to `base` when that is possible.
pub fn display_path(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect::<PathBuf>()
        .to_string_lossy()
        .to_string()
}

/// Read a unit. Invalid UTF-8 is the unit's problem, not the run's.
pub(crate) fn read_unit(path: &Path) -> Result<Result<String, String>, ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8(bytes).map_err(|err| {
        format!(
            "file is not valid UTF-8 (invalid byte at offset {})",
            err.utf8_error().valid_up_to()
        )
    }))
}

/// Scan every unit and assemble a deterministic report.
pub fn run_scan(
    units: &[PathBuf],
    base: &Path,
    opts: &ScanOptions,
) -> Result<ScanReport, ConfigError> {
    let outcomes = units
        .par_iter()
        .map(|path| -> Result<_, ConfigError> {
            let file = display_path(path, base);
            debug!(unit = %file, "scanning unit");
            Ok(match read_unit(path)? {
                Ok(source) => scan_unit(&file, &source, opts),
                Err(message) => {
                    warn!(unit = %file, "skipping unit that is not UTF-8");
                    (
                        Vec::new(),
                        Some(ParseDiagnostic {
                            file,
                            line: 1,
                            column: 1,
                            message,
                        }),
                    )
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut findings: Vec<Finding> = Vec::new();
    let mut parse_errors: Vec<ParseDiagnostic> = Vec::new();
    for (mut found, parse_error) in outcomes {
        findings.append(&mut found);
        parse_errors.extend(parse_error);
    }
    findings.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then(a.column.cmp(&b.column))
    });
    parse_errors.sort_by(|a, b| a.file.cmp(&b.file));

    let summary = Summary {
        findings: findings.len(),
        parse_errors: parse_errors.len(),
        files: units.len(),
    };
    info!(
        findings = summary.findings,
        parse_errors = summary.parse_errors,
        files = summary.files,
        "scan complete"
    );
    Ok(ScanReport {
        findings,
        parse_errors,
        summary,
    })
}
