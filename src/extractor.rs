//! Literal Extractor - turns one assertion call into a test case record.
//!
//! The input grammar is narrow and enforced: a rule identifier, a
//! template-literal query, and (for the failing helper) an array of
//! error-constructor calls. Anything else is a fatal shape violation,
//! reported with the offending node's kind and span.

use std::collections::{BTreeMap, HashMap};

use tree_sitter::Node;

use crate::errors::{to_source_span, ErrorReporting, ScenaristError};
use crate::locator::ErrorConstructorSignature;
use crate::syntax::{
    call_arguments, callee_name, decode_literal, decode_string_literal, is_function_node,
    named_children, node_text, template_raw, LiteralValue,
};

/// One extracted test: created from one test-case node, consumed once by the
/// scenario builder, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseRecord {
    pub name: String,
    /// Identifier of the rule under test.
    pub rule: String,
    /// Literal template text, un-stripped.
    pub raw_query: String,
    /// None means "expect success".
    pub expected_errors: Option<Vec<ExpectedError>>,
}

/// One expected validation error, reconstructed from a constructor call.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExpectedError {
    #[serde(rename = "error-code")]
    pub error_code: String,
    /// Keyed by the constructor's parameter names, minus `line`/`column`.
    pub args: BTreeMap<String, LiteralValue>,
    pub loc: ErrorLocation,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ErrorLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<i64>,
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Decode a test case's declared name; fatal when it is not a string literal.
pub fn test_case_name(
    name_node: Node<'_>,
    source: &str,
    ctx: &impl ErrorReporting,
) -> Result<String, ScenaristError> {
    decode_string_literal(name_node, source).ok_or_else(|| {
        ctx.unexpected_shape(
            "string literal test name",
            name_node.kind(),
            to_source_span(name_node.byte_range()),
        )
    })
}

/// Require the second test-case argument to be a function expression.
pub fn require_test_function(
    fn_node: Node<'_>,
    ctx: &impl ErrorReporting,
) -> Result<(), ScenaristError> {
    if is_function_node(fn_node) {
        Ok(())
    } else {
        Err(ctx.unexpected_shape(
            "test function expression",
            fn_node.kind(),
            to_source_span(fn_node.byte_range()),
        ))
    }
}

/// Extract one `TestCaseRecord` from an assertion call expression.
///
/// The call's first argument must be a plain rule identifier, the second a
/// template literal. `expectFailsRule` additionally requires an array of
/// constructor calls as the third argument; `expectPassesRule` reads no
/// third argument at all.
pub fn extract_test_case(
    name: String,
    assertion_call: Node<'_>,
    signatures: &HashMap<String, ErrorConstructorSignature>,
    source: &str,
    ctx: &impl ErrorReporting,
) -> Result<TestCaseRecord, ScenaristError> {
    let helper = callee_name(assertion_call, source).ok_or_else(|| {
        ctx.unexpected_shape(
            "assertion call with an identifier callee",
            assertion_call.kind(),
            to_source_span(assertion_call.byte_range()),
        )
    })?;
    let arguments = call_arguments(assertion_call);

    let rule_node = *arguments.first().ok_or_else(|| {
        ctx.unexpected_shape(
            "rule identifier argument",
            "no arguments",
            to_source_span(assertion_call.byte_range()),
        )
    })?;
    if rule_node.kind() != "identifier" {
        return Err(ctx.unexpected_shape(
            "rule identifier",
            rule_node.kind(),
            to_source_span(rule_node.byte_range()),
        ));
    }
    let rule = node_text(rule_node, source).to_string();

    let query_node = *arguments.get(1).ok_or_else(|| {
        ctx.unexpected_shape(
            "template literal query argument",
            "no second argument",
            to_source_span(assertion_call.byte_range()),
        )
    })?;
    let raw_query = template_raw(query_node, source)
        .ok_or_else(|| {
            ctx.unexpected_shape(
                "template literal query",
                query_node.kind(),
                to_source_span(query_node.byte_range()),
            )
        })?
        .to_string();

    let expected_errors = if helper == "expectFailsRule" {
        let errors_node = *arguments.get(2).ok_or_else(|| {
            ctx.unexpected_shape(
                "array of expected errors",
                "no third argument",
                to_source_span(assertion_call.byte_range()),
            )
        })?;
        if errors_node.kind() != "array" {
            return Err(ctx.unexpected_shape(
                "array of expected errors",
                errors_node.kind(),
                to_source_span(errors_node.byte_range()),
            ));
        }
        let mut errors = Vec::new();
        for element in named_children(errors_node) {
            if element.kind() != "call_expression" {
                return Err(ctx.unexpected_shape(
                    "error constructor call",
                    element.kind(),
                    to_source_span(element.byte_range()),
                ));
            }
            errors.push(expand_expected_error(element, signatures, source, ctx)?);
        }
        Some(errors)
    } else {
        None
    };

    Ok(TestCaseRecord {
        name,
        rule,
        raw_query,
        expected_errors,
    })
}

/// Expand one constructor call into an `ExpectedError` by zipping its
/// positional arguments with the matching signature's parameter names.
///
/// Arguments beyond the declared parameter count are dropped silently, and
/// argument shapes other than plain literals and array literals are ignored.
fn expand_expected_error(
    call: Node<'_>,
    signatures: &HashMap<String, ErrorConstructorSignature>,
    source: &str,
    ctx: &impl ErrorReporting,
) -> Result<ExpectedError, ScenaristError> {
    let code = callee_name(call, source).ok_or_else(|| {
        ctx.unexpected_shape(
            "error constructor identifier",
            call.kind(),
            to_source_span(call.byte_range()),
        )
    })?;
    let signature = signatures
        .get(code)
        .ok_or_else(|| ctx.unknown_error_code(code, to_source_span(call.byte_range())))?;

    let mut args = BTreeMap::new();
    let mut loc = ErrorLocation::default();

    for (argument, parameter) in call_arguments(call).into_iter().zip(&signature.parameters) {
        match parameter.as_str() {
            "line" => loc.line = decode_literal(argument, source).and_then(|v| v.as_integer()),
            "column" => loc.column = decode_literal(argument, source).and_then(|v| v.as_integer()),
            name => {
                if let Some(value) = decode_literal(argument, source) {
                    args.insert(name.to_string(), value);
                } else if argument.kind() == "array" {
                    let values = named_children(argument)
                        .into_iter()
                        .map(|element| decode_literal(element, source).unwrap_or(LiteralValue::Null))
                        .collect();
                    args.insert(name.to_string(), LiteralValue::List(values));
                }
                // Other argument shapes fall through unstored.
            }
        }
    }

    Ok(ExpectedError {
        error_code: code.to_string(),
        args,
        loc,
    })
}
