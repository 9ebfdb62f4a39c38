//! Inline comment markers.
//!
//! `ok: <rule-id>` on the line above a construction suppresses its finding.
//! `ruleid: <rule-id>` marks the next line as an expected finding in test
//! fixtures. Both accept a comma-separated list of ids.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Ok,
    RuleId,
}

fn marker_regex(marker: Marker) -> &'static Regex {
    static OK: OnceLock<Regex> = OnceLock::new();
    static RULE_ID: OnceLock<Regex> = OnceLock::new();
    let (cell, pattern) = match marker {
        Marker::Ok => (&OK, r"(?:^|[^\w-])ok:\s*([\w.-]+(?:\s*,\s*[\w.-]+)*)"),
        Marker::RuleId => (
            &RULE_ID,
            r"(?:^|[^\w-])ruleid:\s*([\w.-]+(?:\s*,\s*[\w.-]+)*)",
        ),
    };
    cell.get_or_init(|| Regex::new(pattern).expect("marker pattern is valid"))
}

/// Whether `line` carries `marker` naming `rule_id`.
pub fn names_rule(line: &str, marker: Marker, rule_id: &str) -> bool {
    marker_regex(marker)
        .captures_iter(line)
        .any(|caps| caps[1].split(',').any(|id| id.trim() == rule_id))
}

/// 1-based number of the closest non-blank line above `line`.
pub fn preceding_nonblank(lines: &[&str], line: usize) -> Option<usize> {
    (1..line)
        .rev()
        .find(|&n| lines.get(n - 1).is_some_and(|l| !l.trim().is_empty()))
}

/// 1-based number of the closest non-blank line below `line`.
pub fn following_nonblank(lines: &[&str], line: usize) -> Option<usize> {
    (line + 1..=lines.len()).find(|&n| !lines[n - 1].trim().is_empty())
}
