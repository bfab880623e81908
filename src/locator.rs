//! Pattern Locator - finds the structurally relevant nodes in the tree.
//!
//! This walker understands only the handful of shapes the tool cares about:
//! error-constructor function declarations, the `describe` suite, its nested
//! `it` cases, and the assertion call inside one test body. Ancestor chains
//! are transient snapshots of the traversal path stack, innermost first,
//! never stored back into the tree.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::syntax::{named_children, node_text};

/// The two assertion helpers a test case may invoke.
pub const ASSERTION_HELPERS: [&str; 2] = ["expectFailsRule", "expectPassesRule"];

/// Resolution policy for duplicate declarations and repeated assertion
/// identifiers inside one test body. Later occurrences in traversal order
/// replace earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    LastWins,
}

pub const DUPLICATE_POLICY: DuplicatePolicy = DuplicatePolicy::LastWins;

/// A source-declared function whose signature defines how to interpret the
/// positional arguments of an expected-error declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorConstructorSignature {
    pub name: String,
    /// Ordered parameter names; position determines argument mapping.
    pub parameters: Vec<String>,
}

/// An identifier hit paired with its ancestor chain, innermost first, up to
/// the root of the traversal.
#[derive(Debug, Clone)]
pub struct Match<'t> {
    pub node: Node<'t>,
    pub ancestors: Vec<Node<'t>>,
}

impl<'t> Match<'t> {
    /// The call expression this identifier is the callee of, when its
    /// immediate ancestor has that shape.
    pub fn enclosing_call(&self) -> Option<Node<'t>> {
        self.ancestors
            .first()
            .copied()
            .filter(|node| node.kind() == "call_expression")
    }
}

// ============================================================================
// LOCATOR OPERATIONS
// ============================================================================

/// Scan every function declaration in the tree; one qualifies as an error
/// constructor iff its parameter names include both `line` and `column`.
/// The full ordered parameter list is recorded under the declared name.
pub fn locate_error_constructors(
    root: Node<'_>,
    source: &str,
) -> HashMap<String, ErrorConstructorSignature> {
    let mut table = HashMap::new();

    preorder(root, &mut Vec::new(), &mut |node, _ancestors| {
        if node.kind() != "function_declaration" {
            return;
        }
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let Some(params_node) = node.child_by_field_name("parameters") else {
            return;
        };
        let parameters: Vec<String> = named_children(params_node)
            .into_iter()
            .map(|param| node_text(param, source).to_string())
            .collect();

        if parameters.iter().any(|p| p == "line") && parameters.iter().any(|p| p == "column") {
            let name = node_text(name_node, source).to_string();
            let signature = ErrorConstructorSignature {
                name: name.clone(),
                parameters,
            };
            match DUPLICATE_POLICY {
                DuplicatePolicy::LastWins => {
                    table.insert(name, signature);
                }
            }
        }
    });

    table
}

/// The first identifier named exactly `describe`, in deterministic pre-order,
/// with its ancestor chain. None means the caller must not proceed.
pub fn locate_test_suite<'t>(root: Node<'t>, source: &str) -> Option<Match<'t>> {
    locate_identifiers(root, source, "describe").into_iter().next()
}

/// Every identifier named exactly `it` within the suite call's subtree, in
/// source (pre-order) order. That order becomes the output test order.
pub fn locate_test_cases<'t>(suite_call: Node<'t>, source: &str) -> Vec<Match<'t>> {
    locate_identifiers(suite_call, source, "it")
}

/// The call expression of the single assertion helper invoked inside one
/// test body. With multiple candidates the last one visited wins, per
/// `DUPLICATE_POLICY`. None means the test case is skipped, not fatal.
pub fn locate_assertion_call<'t>(test_function: Node<'t>, source: &str) -> Option<Node<'t>> {
    let mut found = None;

    preorder(test_function, &mut Vec::new(), &mut |node, ancestors| {
        if node.kind() != "identifier" {
            return;
        }
        let name = node_text(node, source);
        if !ASSERTION_HELPERS.contains(&name) {
            return;
        }
        if let Some(parent) = ancestors.last() {
            match DUPLICATE_POLICY {
                DuplicatePolicy::LastWins => found = Some(*parent),
            }
        }
    });

    found
}

// ============================================================================
// TRAVERSAL
// ============================================================================

/// Deterministic pre-order walk with an accumulated path stack. The callback
/// sees the path outermost-first; `Match` reverses it to innermost-first.
fn preorder<'t>(
    node: Node<'t>,
    path: &mut Vec<Node<'t>>,
    visit: &mut impl FnMut(Node<'t>, &[Node<'t>]),
) {
    visit(node, path);
    path.push(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        preorder(child, path, visit);
    }
    path.pop();
}

fn locate_identifiers<'t>(root: Node<'t>, source: &str, name: &str) -> Vec<Match<'t>> {
    let mut matches = Vec::new();

    preorder(root, &mut Vec::new(), &mut |node, ancestors| {
        if node.kind() == "identifier" && node_text(node, source) == name {
            matches.push(Match {
                node,
                ancestors: ancestors.iter().rev().copied().collect(),
            });
        }
    });

    matches
}
