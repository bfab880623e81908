//! Syntax layer: the JavaScript parser adapter and literal decoding.
//!
//! Everything that knows tree-sitter node kinds lives here; the locator and
//! extractor only reason about the handful of shapes this tool cares about.

pub mod literals;
pub mod parser;

pub use literals::{decode_literal, decode_string_literal, template_raw, LiteralValue};
pub use parser::{
    call_arguments, callee_name, is_function_node, named_children, node_text, parse,
};
