pub use crate::errors::{ErrorKind, ErrorReporting, ReportContext, ScenaristError, SourceContext};

pub mod cli;
pub mod engine;
pub mod errors;
pub mod extractor;
pub mod locator;
pub mod scenario;
pub mod syntax;
