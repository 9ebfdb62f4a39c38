//! Output rendering for scan, fixture and rule listings.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary. Renderers return strings so they
//! can be tested without capturing stdout.

use crate::fixture::FixtureOutcome;
use crate::models::{OutputMode, ScanReport, Severity};
use crate::rule::RuleInfo;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fmt::Write as _;

pub fn use_colors(output: OutputMode) -> bool {
    output != OutputMode::Json && std::env::var_os("NO_COLOR").is_none()
}

fn paint(text: &str, color: bool, style: fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

fn severity_tag(severity: Severity, color: bool) -> (String, String) {
    match severity {
        Severity::Error => (
            paint("✖", color, |s| s.red().to_string()),
            paint("⟦error⟧", color, |s| s.red().bold().to_string()),
        ),
        Severity::Warning => (
            paint("▲", color, |s| s.yellow().to_string()),
            paint("⟦warn⟧", color, |s| s.yellow().bold().to_string()),
        ),
    }
}

fn location(file: &str, line: usize, column: usize, color: bool) -> String {
    paint(&format!("{file}:{line}:{column}"), color, |s| {
        s.bold().to_string()
    })
}

/// Human rendering of a scan: findings, then parse diagnostics, then the
/// summary line.
pub fn render_scan_human(report: &ScanReport, color: bool) -> String {
    let mut out = String::new();
    for f in &report.findings {
        let (icon, tag) = severity_tag(f.severity, color);
        let _ = writeln!(
            out,
            "{} {} {} ❲{}❳ — {}",
            icon,
            tag,
            location(&f.file, f.line, f.column, color),
            f.rule,
            f.message
        );
    }
    for d in &report.parse_errors {
        let _ = writeln!(
            out,
            "{} {} {} — {}",
            paint("◆", color, |s| s.blue().to_string()),
            paint("⟦parse⟧", color, |s| s.blue().bold().to_string()),
            location(&d.file, d.line, d.column, color),
            d.message
        );
    }
    let summary = format!(
        "— Summary — findings={} parse_errors={} files={}",
        report.summary.findings, report.summary.parse_errors, report.summary.files
    );
    let _ = writeln!(out, "{}", paint(&summary, color, |s| s.bold().to_string()));
    out
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(report: &ScanReport) -> serde_json::Result<JsonVal> {
    serde_json::to_value(report)
}

/// Print scan results in the requested format.
pub fn print_scan(report: &ScanReport, output: OutputMode) -> serde_json::Result<()> {
    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&compose_scan_json(report)?)?)
        }
        OutputMode::Human => print!("{}", render_scan_human(report, use_colors(output))),
    }
    Ok(())
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_fixtures_human(outcomes: &[FixtureOutcome], color: bool) -> String {
    let mut out = String::new();
    for o in outcomes {
        if o.passed() {
            let _ = writeln!(
                out,
                "{} {} ({} expected)",
                paint("✔ pass:", color, |s| s.green().bold().to_string()),
                o.file,
                o.expected.len()
            );
            continue;
        }
        let _ = writeln!(
            out,
            "{} {}",
            paint("✖ fail:", color, |s| s.red().bold().to_string()),
            paint(&o.file, color, |s| s.bold().to_string())
        );
        if let Some(d) = &o.parse_error {
            let _ = writeln!(out, "    parse error at {}:{}: {}", d.line, d.column, d.message);
        }
        if !o.missing.is_empty() {
            let _ = writeln!(out, "    missing findings on lines: {}", join_lines(&o.missing));
        }
        if !o.unexpected.is_empty() {
            let _ = writeln!(
                out,
                "    unexpected findings on lines: {}",
                join_lines(&o.unexpected)
            );
        }
    }
    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    let summary = format!(
        "— Summary — passed={} failed={} total={}",
        outcomes.len() - failed,
        failed,
        outcomes.len()
    );
    let _ = writeln!(out, "{}", paint(&summary, color, |s| s.bold().to_string()));
    out
}

/// Compose fixture JSON object (pure) for testing/snapshot purposes.
pub fn compose_fixtures_json(outcomes: &[FixtureOutcome]) -> serde_json::Result<JsonVal> {
    let items: Vec<JsonVal> = outcomes
        .iter()
        .map(|o| -> serde_json::Result<JsonVal> {
            let mut item = serde_json::to_value(o)?;
            item["passed"] = JsonVal::Bool(o.passed());
            Ok(item)
        })
        .collect::<serde_json::Result<_>>()?;
    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    let summary = json!({
        "passed": outcomes.len() - failed,
        "failed": failed,
        "total": outcomes.len(),
    });
    Ok(json!({"results": items, "summary": summary}))
}

pub fn print_fixtures(outcomes: &[FixtureOutcome], output: OutputMode) -> serde_json::Result<()> {
    match output {
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&compose_fixtures_json(outcomes)?)?
        ),
        OutputMode::Human => print!("{}", render_fixtures_human(outcomes, use_colors(output))),
    }
    Ok(())
}

pub fn render_rules_human(rules: &[RuleInfo], color: bool) -> String {
    let mut out = String::new();
    for r in rules {
        let (icon, tag) = severity_tag(r.severity, color);
        let _ = writeln!(
            out,
            "{} {} {}\n    {}",
            icon,
            tag,
            paint(r.id, color, |s| s.bold().to_string()),
            r.description
        );
    }
    out
}

pub fn print_rules(rules: &[RuleInfo], output: OutputMode) -> serde_json::Result<()> {
    match output {
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "rules": rules }))?
        ),
        OutputMode::Human => print!("{}", render_rules_human(rules, use_colors(output))),
    }
    Ok(())
}
