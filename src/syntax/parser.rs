//! JavaScript parser adapter - thin wrapper over tree-sitter.
//!
//! Parsing is purely syntactic; the tree is handed to the locator as-is.
//! The helpers below are the only node-shape vocabulary the rest of the
//! pipeline uses: call arguments, callee names, and child enumeration.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::errors::{to_source_span, unspanned, ErrorReporting, ReportContext, ScenaristError, SourceContext};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse JavaScript source into a concrete syntax tree.
///
/// A tree containing syntax errors is rejected outright: the input grammar
/// for this tool is a well-formed test file, not arbitrary text.
pub fn parse(source_text: &str, source_context: &SourceContext) -> Result<Tree, ScenaristError> {
    let ctx = ReportContext::new(source_context.clone(), "parse");

    let mut parser = Parser::new();
    let language: Language = tree_sitter_javascript::LANGUAGE.into();
    parser
        .set_language(&language)
        .map_err(|e| ctx.malformed_source(&format!("failed to load grammar: {e}"), unspanned()))?;

    let tree = parser
        .parse(source_text, None)
        .ok_or_else(|| ctx.malformed_source("parser produced no tree", unspanned()))?;

    if tree.root_node().has_error() {
        let span = first_error_node(tree.root_node())
            .map(|node| to_source_span(node.byte_range()))
            .unwrap_or_else(unspanned);
        return Err(ctx.malformed_source("syntax error", span));
    }

    Ok(tree)
}

/// Slice the source text covered by a node.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Collect the named children of a node, skipping punctuation tokens.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// The named argument nodes of a call expression, in positional order.
pub fn call_arguments<'t>(call: Node<'t>) -> Vec<Node<'t>> {
    call.child_by_field_name("arguments")
        .map(named_children)
        .unwrap_or_default()
}

/// The callee name of a call expression, when the callee is a plain
/// identifier. Member expressions and other callee shapes yield None.
pub fn callee_name<'a>(call: Node<'_>, source: &'a str) -> Option<&'a str> {
    let callee = call.child_by_field_name("function")?;
    if callee.kind() == "identifier" {
        Some(node_text(callee, source))
    } else {
        None
    }
}

/// Whether a node is a function-expression shape usable as a test body.
pub fn is_function_node(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function"
    )
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.has_error() {
            continue;
        }
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Tree {
        parse(source, &SourceContext::from_file("test.js", source)).unwrap()
    }

    #[test]
    fn parses_a_trivial_program() {
        let tree = parse_ok("describe(\"x\", () => {});");
        assert_eq!(tree.root_node().kind(), "program");
    }

    #[test]
    fn rejects_broken_source() {
        let source = "function f(a, b { }";
        let result = parse(source, &SourceContext::from_file("test.js", source));
        assert!(result.is_err());
    }

    #[test]
    fn call_arguments_skip_punctuation() {
        let source = "f(a, \"b\", 3);";
        let tree = parse_ok(source);
        let root = tree.root_node();
        let call = root.child(0).unwrap().child(0).unwrap();
        assert_eq!(call.kind(), "call_expression");
        let args = call_arguments(call);
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].kind(), "identifier");
        assert_eq!(args[1].kind(), "string");
        assert_eq!(args[2].kind(), "number");
    }

    #[test]
    fn callee_name_requires_plain_identifier() {
        let source = "expectPassesRule(R, `q`); obj.method(1);";
        let tree = parse_ok(source);
        let root = tree.root_node();
        let first = root.child(0).unwrap().child(0).unwrap();
        let second = root.child(1).unwrap().child(0).unwrap();
        assert_eq!(callee_name(first, source), Some("expectPassesRule"));
        assert_eq!(callee_name(second, source), None);
    }
}
