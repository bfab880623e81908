//! Defines the command-line arguments for the scenarist CLI.
//!
//! Uses the `clap` crate with its "derive" feature for a declarative and
//! type-safe argument structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "scenarist",
    version,
    about = "Converts describe/it-style rule-validation tests into a YAML scenario document."
)]
pub struct ScenaristArgs {
    /// The test source file to convert.
    #[arg(default_value = "test.js")]
    pub input: PathBuf,

    /// Write the scenario document to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
