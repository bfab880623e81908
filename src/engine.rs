//! Pipeline orchestration: parse, locate, extract, build.
//!
//! One invocation processes one source file, synchronously, and produces one
//! document plus the list of skipped test names. Presentation (YAML
//! rendering, diagnostics printing) belongs to the CLI, which keeps the
//! pipeline itself directly testable.

use crate::errors::{to_source_span, ErrorReporting, ReportContext, ScenaristError, SourceContext};
use crate::extractor::{self, TestCaseRecord};
use crate::locator;
use crate::scenario::{self, ScenarioDocument};
use crate::syntax;

/// The result of one pipeline run.
#[derive(Debug)]
pub struct Generation {
    pub document: ScenarioDocument,
    /// Names of test cases omitted because no assertion call was found,
    /// in source order. Diagnostics, not failures.
    pub skipped: Vec<String>,
}

/// Run the full pipeline over one source file.
pub fn generate(source: &str, source_name: &str) -> Result<Generation, ScenaristError> {
    let source_context = SourceContext::from_file(source_name, source);
    let tree = syntax::parse(source, &source_context)?;
    let root = tree.root_node();

    let locate_ctx = ReportContext::new(source_context.clone(), "locate");
    let signatures = locator::locate_error_constructors(root, source);

    let suite = locator::locate_test_suite(root, source)
        .ok_or_else(|| locate_ctx.missing_suite())?;
    let suite_call = suite.enclosing_call().ok_or_else(|| {
        locate_ctx.unexpected_shape(
            "suite call expression",
            suite.ancestors.first().map_or("nothing", |n| n.kind()),
            to_source_span(suite.node.byte_range()),
        )
    })?;

    let suite_arguments = syntax::call_arguments(suite_call);
    let scenario_name = suite_arguments
        .first()
        .and_then(|node| syntax::decode_string_literal(*node, source))
        .ok_or_else(|| {
            locate_ctx.unexpected_shape(
                "string literal suite name",
                suite_arguments.first().map_or("no arguments", |n| n.kind()),
                to_source_span(suite_call.byte_range()),
            )
        })?;

    let extract_ctx = ReportContext::new(source_context, "extract");
    let mut records: Vec<TestCaseRecord> = Vec::new();
    let mut skipped = Vec::new();

    for case in locator::locate_test_cases(suite_call, source) {
        let case_call = case.enclosing_call().ok_or_else(|| {
            extract_ctx.unexpected_shape(
                "test case call expression",
                case.ancestors.first().map_or("nothing", |n| n.kind()),
                to_source_span(case.node.byte_range()),
            )
        })?;
        let arguments = syntax::call_arguments(case_call);

        let name_node = *arguments.first().ok_or_else(|| {
            extract_ctx.unexpected_shape(
                "string literal test name",
                "no arguments",
                to_source_span(case_call.byte_range()),
            )
        })?;
        let fn_node = *arguments.get(1).ok_or_else(|| {
            extract_ctx.unexpected_shape(
                "test function expression",
                "no second argument",
                to_source_span(case_call.byte_range()),
            )
        })?;

        let test_name = extractor::test_case_name(name_node, source, &extract_ctx)?;
        extractor::require_test_function(fn_node, &extract_ctx)?;

        match locator::locate_assertion_call(fn_node, source) {
            Some(assertion_call) => {
                records.push(extractor::extract_test_case(
                    test_name,
                    assertion_call,
                    &signatures,
                    source,
                    &extract_ctx,
                )?);
            }
            None => skipped.push(test_name),
        }
    }

    Ok(Generation {
        document: scenario::build_document(scenario_name, records),
        skipped,
    })
}
