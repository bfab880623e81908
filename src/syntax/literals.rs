//! Literal decoding: JavaScript literal nodes into plain values.
//!
//! The extractor stores these values directly into the scenario document, so
//! the enum mirrors what YAML can carry, not what JavaScript can express.

use serde::Serialize;
use tree_sitter::Node;

use super::parser::{named_children, node_text};

/// A decoded literal value, serialized untagged so YAML output reads as the
/// plain scalar or sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<LiteralValue>),
}

impl LiteralValue {
    /// The numeric value as an integer, when this literal is a number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LiteralValue::Int(n) => Some(*n),
            LiteralValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }
}

/// Decode a plain literal node (string, number, boolean, null).
///
/// Returns None for any other node shape; the caller decides whether that
/// is a skip or a shape violation.
pub fn decode_literal(node: Node<'_>, source: &str) -> Option<LiteralValue> {
    match node.kind() {
        "string" => decode_string_literal(node, source).map(LiteralValue::Str),
        "number" => Some(decode_number(node_text(node, source))),
        "true" => Some(LiteralValue::Bool(true)),
        "false" => Some(LiteralValue::Bool(false)),
        "null" => Some(LiteralValue::Null),
        _ => None,
    }
}

/// Decode a string literal node into its cooked value, processing escape
/// sequences the way the source language would.
pub fn decode_string_literal(node: Node<'_>, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut value = String::new();
    for child in named_children(node) {
        match child.kind() {
            "string_fragment" => value.push_str(node_text(child, source)),
            "escape_sequence" => value.push_str(&decode_escape(node_text(child, source))),
            _ => {}
        }
    }
    Some(value)
}

/// The raw text of a template literal's first quasi segment: everything
/// between the opening backtick and the first substitution (or the closing
/// backtick when there is none). Escapes are left raw, matching how the
/// downstream harness expects query templates verbatim.
pub fn template_raw<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    if node.kind() != "template_string" {
        return None;
    }
    let start = node.start_byte() + 1;
    let mut end = node.end_byte().saturating_sub(1);
    for child in named_children(node) {
        if child.kind() == "template_substitution" {
            end = child.start_byte();
            break;
        }
    }
    source.get(start..end.max(start))
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn decode_number(text: &str) -> LiteralValue {
    if let Ok(n) = text.parse::<i64>() {
        LiteralValue::Int(n)
    } else if let Ok(f) = text.parse::<f64>() {
        LiteralValue::Float(f)
    } else {
        // Exotic numeric syntax (hex, separators) never appears in the test
        // files this tool consumes; preserve the raw text rather than lose it.
        LiteralValue::Str(text.to_string())
    }
}

fn decode_escape(text: &str) -> String {
    let mut chars = text.chars();
    if chars.next() != Some('\\') {
        return text.to_string();
    }
    match chars.next() {
        Some('n') => "\n".to_string(),
        Some('t') => "\t".to_string(),
        Some('r') => "\r".to_string(),
        Some('0') => "\0".to_string(),
        Some('u') => decode_unicode_escape(chars.as_str()).unwrap_or_else(|| text.to_string()),
        Some(other) => other.to_string(),
        None => "\\".to_string(),
    }
}

fn decode_unicode_escape(rest: &str) -> Option<String> {
    let digits = rest
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(rest);
    let code = u32::from_str_radix(digits, 16).ok()?;
    char::from_u32(code).map(|c| c.to_string())
}
