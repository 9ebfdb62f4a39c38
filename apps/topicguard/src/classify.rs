//! Static evaluation of filter-query field values.
//!
//! Values are classified without running or type-checking anything:
//! - `nil`, `T(nil)` conversions, and literals whose slots are all empty are
//!   `Empty`. A `nil` row in `[][]Hash{nil, {h}}` is a wildcard.
//! - A literal with at least one concrete entry at the innermost level is
//!   `NonEmpty`.
//! - Variables, calls and anything else producing a slice are `Unknown`.
//!
//! Unknown values never produce findings; a local rule that guesses wrong is
//! worse than one that stays quiet.

use crate::go::syntax;
use crate::models::signature::FilterSignature;
use crate::scanner::FilterQuerySite;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Populated {
    Empty,
    NonEmpty,
    Unknown,
}

impl Populated {
    /// Combine the states of sibling slots.
    fn join(self, other: Populated) -> Populated {
        match (self, other) {
            (Populated::NonEmpty, _) | (_, Populated::NonEmpty) => Populated::NonEmpty,
            (Populated::Unknown, _) | (_, Populated::Unknown) => Populated::Unknown,
            _ => Populated::Empty,
        }
    }
}

/// Classify the value `node` as a value expected to have `depth` slice levels.
///
/// Recursion follows the tree, whose depth `go::parse_unit` has bounded.
pub fn evaluate(node: Node<'_>, depth: usize) -> Populated {
    match node.kind() {
        "literal_element" => evaluate(syntax::unwrap_element(node), depth),
        "nil" => Populated::Empty,
        "parenthesized_expression" => match syntax::elements(node).first() {
            Some(inner) => evaluate(*inner, depth),
            None => Populated::Unknown,
        },
        "composite_literal" => {
            // Named types (`Topics{...}` for `type Topics [][]Hash`) keep the
            // expected depth; only an explicit slice type overrides it.
            let depth = node
                .child_by_field_name("type")
                .and_then(syntax::slice_depth)
                .unwrap_or(depth);
            match node.child_by_field_name("body") {
                Some(body) => evaluate_body(body, depth),
                None => Populated::Unknown,
            }
        }
        "literal_value" => evaluate_body(node, depth),
        _ if syntax::is_nil_conversion(node) => Populated::Empty,
        _ if depth == 0 => Populated::NonEmpty,
        _ => Populated::Unknown,
    }
}

fn evaluate_body(body: Node<'_>, depth: usize) -> Populated {
    if depth == 0 {
        return Populated::NonEmpty;
    }
    syntax::elements(body)
        .into_iter()
        .map(|element| match syntax::key_value(element) {
            Some((_, value)) => value,
            None => element,
        })
        .map(|value| evaluate(value, depth - 1))
        .fold(Populated::Empty, Populated::join)
}

/// Topics are constrained while the emitting address is empty or absent.
pub fn has_topics_without_address(site: &FilterQuerySite, signature: &FilterSignature) -> bool {
    let topics = site.state_of(&signature.topics);
    let address = site.state_of(&signature.addresses);
    topics == Some(Populated::NonEmpty) && matches!(address, None | Some(Populated::Empty))
}
