//! Scenarist Error Handling - Unified Encapsulated API
//!
//! Every failure mode of the pipeline is a `ScenaristError`: one struct, one
//! kind enum, one miette `Diagnostic` impl. Fatal shape violations carry the
//! byte span of the offending node so reports point at the source.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source context for error reporting: the file name and its full content,
/// attachable to any error produced while processing that file.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("// {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// All failure modes as a clean enum - no duplicate fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The input is not parseable as JavaScript. Nothing downstream can run.
    #[error("source is not parseable: {detail}")]
    MalformedSource { detail: String },

    /// No `describe` suite declaration exists anywhere in the source.
    #[error("no `describe` suite declaration found")]
    MissingSuite,

    /// A node does not have the shape the input grammar requires
    /// (non-literal test name, non-template query, non-array error list, ...).
    #[error("expected {expected}, found {found}")]
    UnexpectedShape { expected: String, found: String },

    /// An expected-error call references a constructor that was never
    /// declared with `line` and `column` parameters.
    #[error("expected error `{code}` does not resolve to a declared error constructor")]
    UnknownErrorCode { code: String },
}

/// The single error type - kind, location, and diagnostic enhancement.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ScenaristError {
    /// What went wrong (type-specific data).
    pub kind: ErrorKind,
    /// Where it happened (source + primary span).
    pub source_info: SourceInfo,
    /// How to help (auto-populated based on context).
    pub diagnostic_info: DiagnosticInfo,
}

/// Context-specific source information.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl ErrorKind {
    /// Get the error code suffix for diagnostic codes.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::MalformedSource { .. } => "malformed_source",
            Self::MissingSuite => "missing_suite",
            Self::UnexpectedShape { .. } => "unexpected_shape",
            Self::UnknownErrorCode { .. } => "unknown_error_code",
        }
    }
}

impl Diagnostic for ScenaristError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

impl ScenaristError {
    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::MalformedSource { .. } => "unparseable source".into(),
            ErrorKind::MissingSuite => "no suite in this file".into(),
            ErrorKind::UnexpectedShape { expected, .. } => format!("expected {} here", expected),
            ErrorKind::UnknownErrorCode { .. } => "undeclared error constructor".into(),
        }
    }
}

// ============================================================================
// ERROR REPORTING CONTEXT
// ============================================================================

/// Context-aware error creation - each pipeline phase knows how to create
/// appropriately coded errors without constructing `ScenaristError` by hand.
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements.
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> ScenaristError;

    fn malformed_source(&self, detail: &str, span: SourceSpan) -> ScenaristError {
        self.report(
            ErrorKind::MalformedSource {
                detail: detail.into(),
            },
            span,
        )
    }

    fn missing_suite(&self) -> ScenaristError {
        self.report(ErrorKind::MissingSuite, unspanned())
    }

    fn unexpected_shape(&self, expected: &str, found: &str, span: SourceSpan) -> ScenaristError {
        self.report(
            ErrorKind::UnexpectedShape {
                expected: expected.into(),
                found: found.into(),
            },
            span,
        )
    }

    fn unknown_error_code(&self, code: &str, span: SourceSpan) -> ScenaristError {
        let mut error = self.report(ErrorKind::UnknownErrorCode { code: code.into() }, span);
        error.diagnostic_info.help = Some(format!(
            "declare `function {}(...)` with `line` and `column` among its parameters",
            code
        ));
        error
    }
}

/// General-purpose error creation context used throughout the pipeline.
pub struct ReportContext {
    pub source: SourceContext,
    pub phase: String,
}

impl ReportContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for ReportContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> ScenaristError {
        let error_code = format!("scenarist::{}::{}", self.phase, kind.code_suffix());

        ScenaristError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Creates a placeholder span for errors not tied to a specific source
/// location, such as a missing suite. Makes the empty span explicit.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Converts a tree node's byte range to a miette SourceSpan.
pub fn to_source_span(range: Range<usize>) -> SourceSpan {
    SourceSpan::from(range)
}

/// Prints a ScenaristError with full miette diagnostics.
///
/// Rich error formatting with source spans and help text; use this for
/// user-facing error display in the CLI.
pub fn print_error(error: ScenaristError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
