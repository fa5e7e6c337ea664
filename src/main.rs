//! gitmeta: inject Git repository metadata into builds.
//!
//! This is the main entry point for the `gitmeta` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and maps failures to exit
//! codes: soft failures are reported and let the build continue.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod execution;
pub mod exit_codes;
pub mod fs;
pub mod git;
mod logging;
pub mod output;
pub mod properties;
pub mod repository;
pub mod tasks;
pub mod version;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init();

    match commands::dispatch(&cli.options, cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(failure) if !failure.is_hard() => {
            eprintln!("Warning: {}", describe(&failure));
            ExitCode::from(failure.exit_code() as u8)
        }
        Err(failure) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", describe(&failure));
            ExitCode::from(failure.exit_code() as u8)
        }
    }
}

/// The failure message followed by its chain of causes.
fn describe(failure: &error::BuildFailure) -> String {
    let mut message = failure.to_string();
    let mut last = message.clone();
    let mut source = std::error::Error::source(&failure.error);
    while let Some(cause) = source {
        let text = cause.to_string();
        // Wrapped errors may repeat their cause's message verbatim.
        if text != last {
            message.push_str(": ");
            message.push_str(&text);
        }
        last = text;
        source = cause.source();
    }
    message
}
