//! Turns classified sites into findings.
//!
//! Suppression is a pure function of the site line and the source text: the
//! closest non-blank line above the site must carry `ok: <rule-id>`.

use crate::classify;
use crate::lint::ScanOptions;
use crate::markers::{self, Marker};
use crate::models::Finding;
use crate::rule::{self, RULE_ID};
use crate::scanner::FilterQuerySite;
use tracing::debug;

/// Whether the finding at 1-based `line` is suppressed for `rule_id`.
pub fn is_suppressed(lines: &[&str], line: usize, rule_id: &str) -> bool {
    markers::preceding_nonblank(lines, line)
        .is_some_and(|n| markers::names_rule(lines[n - 1], Marker::Ok, rule_id))
}

/// One finding per flagged, unsuppressed site, sorted by position.
pub fn emit_findings<I>(file: &str, source: &str, sites: I, opts: &ScanOptions) -> Vec<Finding>
where
    I: IntoIterator<Item = FilterQuerySite>,
{
    let lines: Vec<&str> = source.lines().collect();
    let message = rule::message(&opts.signature);
    let mut findings: Vec<Finding> = sites
        .into_iter()
        .filter(|site| classify::has_topics_without_address(site, &opts.signature))
        .filter(|site| {
            let suppressed =
                opts.honor_suppressions && is_suppressed(&lines, site.pos.line, RULE_ID);
            if suppressed {
                debug!(file, line = site.pos.line, "finding suppressed by ok marker");
            }
            !suppressed
        })
        .map(|site| Finding {
            file: file.to_string(),
            line: site.pos.line,
            column: site.pos.column,
            rule: RULE_ID.to_string(),
            severity: opts.severity,
            message: message.clone(),
        })
        .collect();
    findings.sort_by_key(|f| (f.line, f.column));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::parse_unit;
    use crate::models::Severity;
    use crate::scanner;

    const VULNERABLE: &str = "package p\n\nfunc f() {\n\t// ok: ethereum-filter-without-address\n\n\tq := ethereum.FilterQuery{\n\t\tTopics: [][]common.Hash{{sig}},\n\t}\n\t_ = q\n}\n";

    fn emit(src: &str, opts: &ScanOptions) -> Vec<Finding> {
        let unit = parse_unit(src).unwrap();
        emit_findings("q.go", src, scanner::sites(&unit, &opts.signature), opts)
    }

    #[test]
    fn test_suppression_skips_blank_lines_and_is_reversible() {
        let opts = ScanOptions::default();
        assert!(emit(VULNERABLE, &opts).is_empty());

        let unmarked = VULNERABLE.replace("// ok: ethereum-filter-without-address", "");
        let findings = emit(&unmarked, &opts);
        assert_eq!(findings.len(), 1);
        assert_eq!((findings[0].line, findings[0].column), (6, 7));
        assert_eq!(findings[0].rule, RULE_ID);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_marker_for_another_rule_does_not_suppress() {
        let src = VULNERABLE.replace("ok: ethereum-filter-without-address", "ok: some-other-rule");
        assert_eq!(emit(&src, &ScanOptions::default()).len(), 1);
    }

    #[test]
    fn test_marker_must_be_on_closest_nonblank_line() {
        let src = VULNERABLE.replace(
            "// ok: ethereum-filter-without-address\n",
            "// ok: ethereum-filter-without-address\n\tx := 1\n",
        );
        assert_eq!(emit(&src, &ScanOptions::default()).len(), 1);
    }

    #[test]
    fn test_suppressions_can_be_disabled() {
        let opts = ScanOptions {
            honor_suppressions: false,
            severity: Severity::Error,
            ..Default::default()
        };
        let findings = emit(VULNERABLE, &opts);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_first_line_site_has_nothing_above() {
        let lines = ["q := ethereum.FilterQuery{Topics: t}"];
        assert!(!is_suppressed(&lines, 1, RULE_ID));
    }
}
