//! Helpers for the few `tree-sitter-go` node kinds the rule reads.

use tree_sitter::Node;

/// Kinds that spell a type literal in expression position, as in `[]T(nil)`.
const TYPE_KINDS: &[&str] = &[
    "slice_type",
    "array_type",
    "implicit_length_array_type",
    "map_type",
    "pointer_type",
    "channel_type",
    "function_type",
    "parenthesized_type",
    "struct_type",
    "interface_type",
];

/// Named children of `node`, comments excluded.
pub fn elements<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// The expression or elided literal wrapped by a `literal_element`.
pub fn unwrap_element(node: Node<'_>) -> Node<'_> {
    if node.kind() == "literal_element" {
        if let Some(inner) = elements(node).into_iter().next() {
            return inner;
        }
    }
    node
}

/// Key and value of a `keyed_element`, both unwrapped.
pub fn key_value(node: Node<'_>) -> Option<(Node<'_>, Node<'_>)> {
    if node.kind() != "keyed_element" {
        return None;
    }
    match elements(node).as_slice() {
        [key, value] => Some((unwrap_element(*key), unwrap_element(*value))),
        _ => None,
    }
}

/// A key that can only be a struct field name.
pub fn is_field_key(node: Node<'_>) -> bool {
    matches!(node.kind(), "identifier" | "field_identifier")
}

/// Slice or array levels spelled by a literal type. `None` for other types,
/// including named ones whose underlying type is a slice.
pub fn slice_depth(ty: Node<'_>) -> Option<usize> {
    match ty.kind() {
        "slice_type" | "array_type" | "implicit_length_array_type" => Some(
            1 + ty
                .child_by_field_name("element")
                .and_then(slice_depth)
                .unwrap_or(0),
        ),
        _ => None,
    }
}

pub fn is_nil(node: Node<'_>) -> bool {
    node.kind() == "nil"
}

/// `[]T(nil)` and friends.
pub fn is_nil_conversion(node: Node<'_>) -> bool {
    match node.kind() {
        "type_conversion_expression" => node.child_by_field_name("operand").is_some_and(is_nil),
        "call_expression" => {
            node.child_by_field_name("function")
                .is_some_and(|f| TYPE_KINDS.contains(&f.kind()))
                && node
                    .child_by_field_name("arguments")
                    .is_some_and(|args| matches!(elements(args).as_slice(), [arg] if is_nil(*arg)))
        }
        _ => false,
    }
}
