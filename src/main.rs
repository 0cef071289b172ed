//! Runnel: templated command execution with pluggable process backends.
//!
//! This is the main entry point for the `runnel` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes. When a child process actually runs, its own exit code
//! becomes the CLI's exit code.

use runnel::cli::Cli;
use runnel::commands;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {err}");

            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
