//! Discovery of filter-query literals in a parsed unit.
//!
//! Every brace-delimited literal body (`literal_value`) in the tree is a
//! candidate, whether it follows a type (`pkg.T{...}`) or has its type
//! elided inside an enclosing slice, array or map literal. Bodies whose keys
//! all belong to the configured [`FilterSignature`] become sites.

use crate::classify::{self, Populated};
use crate::go::{self, syntax, GoUnit, Pos};
use crate::models::signature::FilterSignature;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};
use tracing::trace;

const LITERAL_QUERY: &str = "(literal_value) @body";

fn literal_query() -> &'static Query {
    static QUERY: OnceLock<Query> = OnceLock::new();
    QUERY.get_or_init(|| {
        Query::new(&go::language(), LITERAL_QUERY).expect("literal query is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// Position of the field key.
    pub pos: Pos,
    pub state: Populated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A filter-query construction found in source.
pub struct FilterQuerySite {
    /// Start of the literal's type, or of its brace when the type is elided.
    pub pos: Pos,
    /// The type as written (`ethereum.FilterQuery`), if any.
    pub type_name: Option<String>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl FilterQuerySite {
    /// Build a site when the literal body `body` has the signature's shape.
    pub fn from_body(unit: &GoUnit<'_>, body: Node<'_>, signature: &FilterSignature) -> Option<Self> {
        let elements = syntax::elements(body);
        if elements.is_empty() {
            return None;
        }
        let mut fields = BTreeMap::new();
        for element in elements {
            let (key, value) = syntax::key_value(element)?;
            if !syntax::is_field_key(key) {
                return None;
            }
            let name = unit.text(key);
            if !signature.accepts(name) {
                return None;
            }
            let state = classify::evaluate(value, signature.depth_of(name));
            fields.insert(
                name.to_string(),
                FieldValue {
                    pos: unit.pos(key),
                    state,
                },
            );
        }
        let typed = body
            .parent()
            .filter(|parent| parent.kind() == "composite_literal");
        Some(Self {
            pos: unit.pos(typed.unwrap_or(body)),
            type_name: typed
                .and_then(|lit| lit.child_by_field_name("type"))
                .map(|ty| unit.text(ty).to_string()),
            fields,
        })
    }

    /// State of `field`, or `None` when the literal does not set it.
    pub fn state_of(&self, field: &str) -> Option<Populated> {
        self.fields.get(field).map(|v| v.state)
    }
}

/// Iterate the filter-query sites of a parsed unit in source order.
pub fn sites<'u, 'a>(unit: &'u GoUnit<'a>, signature: &'u FilterSignature) -> Sites<'u, 'a> {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(literal_query(), unit.root(), unit.source().as_bytes());
    let mut bodies = Vec::new();
    while let Some(m) = matches.next() {
        bodies.extend(m.captures.iter().map(|capture| capture.node));
    }
    bodies.sort_by_key(|body| body.start_byte());
    Sites {
        unit,
        signature,
        bodies: bodies.into_iter(),
    }
}

/// Single-pass iterator over filter-query sites. Candidate bodies are
/// collected up front; sites are built as the iterator advances.
pub struct Sites<'u, 'a> {
    unit: &'u GoUnit<'a>,
    signature: &'u FilterSignature,
    bodies: std::vec::IntoIter<Node<'u>>,
}

impl Iterator for Sites<'_, '_> {
    type Item = FilterQuerySite;

    fn next(&mut self) -> Option<Self::Item> {
        for body in self.bodies.by_ref() {
            if let Some(site) = FilterQuerySite::from_body(self.unit, body, self.signature) {
                trace!(
                    line = site.pos.line,
                    column = site.pos.column,
                    ty = site.type_name.as_deref().unwrap_or("<elided>"),
                    fields = site.fields.len(),
                    "filter query site"
                );
                return Some(site);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::parse_unit;

    const FIXTURE: &str = include_str!("../fixtures/ethereum-filter-without-address.go");

    fn collect(src: &str) -> Vec<FilterQuerySite> {
        let unit = parse_unit(src).unwrap();
        let sig = FilterSignature::default();
        sites(&unit, &sig).collect()
    }

    fn lines(sites: &[FilterQuerySite]) -> Vec<usize> {
        sites.iter().map(|s| s.pos.line).collect()
    }

    #[test]
    fn test_fixture_sites_in_source_order() {
        let found = collect(FIXTURE);
        assert_eq!(lines(&found), vec![21, 40, 46]);
        assert_eq!(found[0].pos.column, 3);
        assert_eq!(found[0].type_name.as_deref(), Some("ethereum.FilterQuery"));
        assert_eq!(found[0].state_of("Topics"), Some(Populated::NonEmpty));
        assert_eq!(found[0].state_of("Addresses"), None);
        assert_eq!(found[2].state_of("Addresses"), Some(Populated::NonEmpty));
        assert_eq!(found[2].fields["Addresses"].pos.line, 49);
    }

    #[test]
    fn test_matching_ignores_import_alias() {
        let src = "package p\n\nimport eth \"github.com/ethereum/go-ethereum\"\n\nvar q = eth.FilterQuery{Topics: [][]common.Hash{{sig}}}\nvar r = FilterQuery{Topics: t}\n";
        let found = collect(src);
        assert_eq!(lines(&found), vec![5, 6]);
        assert_eq!(found[0].type_name.as_deref(), Some("eth.FilterQuery"));
        assert_eq!(found[1].type_name.as_deref(), Some("FilterQuery"));
    }

    #[test]
    fn test_elided_queries_inside_slices() {
        let src = "package p\n\nvar qs = []ethereum.FilterQuery{\n\t{Topics: [][]common.Hash{{a}}},\n\t{Addresses: addrs},\n}\n";
        let found = collect(src);
        assert_eq!(lines(&found), vec![4, 5]);
        assert_eq!(found[0].pos.column, 2);
        assert!(found[0].type_name.is_none());
    }

    #[test]
    fn test_elided_queries_after_map_and_index_keys() {
        let src = "package p\n\nvar byName = map[string]ethereum.FilterQuery{\"transfers\": {Topics: [][]common.Hash{{sig}}}}\nvar pair = [2]ethereum.FilterQuery{1: {Topics: [][]common.Hash{{sig}}}}\n";
        let found = collect(src);
        assert_eq!(lines(&found), vec![3, 4]);
        assert!(found.iter().all(|s| s.type_name.is_none()));
        assert!(found
            .iter()
            .all(|s| s.state_of("Topics") == Some(Populated::NonEmpty)));
        assert_eq!(found[0].pos.column, 59);
        assert_eq!(found[1].pos.column, 39);
    }

    #[test]
    fn test_other_records_are_not_sites() {
        let src = "package p\n\nfunc f() {\n\ta := Config{Topics: t, Name: \"x\"}\n\tb := Sub{Address: addr, Topics: t}\n\tc := T{}\n\td := []int{1, 2}\n\te := map[string]int{\"Topics\": 1}\n}\n";
        assert!(collect(src).is_empty());
    }

    #[test]
    fn test_literal_in_function_literal_is_found() {
        let src = "package p\n\nfunc f() {\n\tgo func() {\n\t\tq := ethereum.FilterQuery{Topics: [][]common.Hash{{x}}}\n\t\t_ = q\n\t}()\n}\n";
        let found = collect(src);
        assert_eq!(lines(&found), vec![5]);
    }

    #[test]
    fn test_pointer_and_nested_field_values() {
        let src = "package p\n\nfunc f() {\n\tsub(&ethereum.FilterQuery{\n\t\tFromBlock: nil,\n\t\tTopics: nil,\n\t})\n}\n";
        let found = collect(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].state_of("FromBlock"), Some(Populated::Empty));
        assert_eq!(found[0].state_of("Topics"), Some(Populated::Empty));
    }

    #[test]
    fn test_iterator_is_lazy_and_single_pass() {
        let unit = parse_unit(FIXTURE).unwrap();
        let sig = FilterSignature::default();
        let mut it = sites(&unit, &sig);
        assert_eq!(it.next().map(|s| s.pos.line), Some(21));
        assert_eq!(it.by_ref().count(), 2);
        assert!(it.next().is_none());
    }
}
