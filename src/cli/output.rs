//! Handles user-facing diagnostic output for the CLI.
//!
//! Skip diagnostics go to stderr, colorized when attached to a terminal, so
//! the YAML document on stdout stays clean for piping.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use std::io::Write;

/// Print one diagnostic line per skipped test case to stderr.
pub fn print_skips(skipped: &[String]) {
    if skipped.is_empty() {
        return;
    }
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    for name in skipped {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = write!(stderr, "Skipping");
        let _ = stderr.reset();
        let _ = writeln!(stderr, " {}", name);
    }
}
