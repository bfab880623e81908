//! The Scenarist Command-Line Interface.
//!
//! This module is the main entry point for the CLI and orchestrates the core
//! library pipeline: read the source file, generate the scenario document,
//! report skips, and emit YAML.

use clap::Parser;
use std::{fs, process};

use crate::cli::args::ScenaristArgs;
use crate::{engine, errors};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ScenaristArgs::parse();

    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let generation = match engine::generate(&source, &args.input.display().to_string()) {
        Ok(generation) => generation,
        Err(error) => {
            errors::print_error(error);
            process::exit(1);
        }
    };

    output::print_skips(&generation.skipped);

    let yaml = match serde_yaml::to_string(&generation.document) {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Error serializing scenario document: {}", e);
            process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, yaml) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => print!("{}", yaml),
    }
}
