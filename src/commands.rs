//! Command implementations for the runnel CLI.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each handler returns the exit code the process should
//! end with; `run` propagates the child's own exit code.

use crate::backend::{default_backend, Backend, Backticks, Fake, PosixSpawn, Spawn};
use crate::cli::{BackendChoice, Command, PreviewArgs, RunArgs};
use crate::config::Config;
use crate::error::{Result, RunnerError};
use crate::exit_codes;
use crate::interpolate::Interpolations;
use crate::options::RunOptions;
use crate::runner::Runner;
use std::path::Path;
use std::sync::Arc;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Run(args) => cmd_run(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Backends => cmd_backends(),
    }
}

fn cmd_run(args: RunArgs) -> Result<i32> {
    let mut runner = resolve_runner(
        args.profile.as_deref(),
        &args.config,
        args.command.as_deref(),
        &args.arguments,
    )?;
    if let Some(backend) = backend_for(args.backend)? {
        runner.set_backend(backend);
    }

    let values: Interpolations = parse_pairs(&args.set, "--set")?.into_iter().collect();

    let mut overrides = RunOptions::new();
    for (key, value) in parse_pairs(&args.env, "--env")? {
        overrides.environment.insert(key, value);
    }
    if args.capture {
        overrides.extra.insert("stdout".to_string(), "piped".into());
    }
    if let Some(cwd) = &args.cwd {
        overrides
            .extra
            .insert("cwd".to_string(), cwd.to_string_lossy().into_owned().into());
    }

    let message = runner.run_with_options(&values, &overrides)?;

    if let Some(stdout) = &message.stdout {
        print!("{stdout}");
    }

    if !message.executed {
        let (command, arguments) = runner.contents(&values);
        eprintln!("not executed (fake backend): {command} {arguments}");
        return Ok(exit_codes::SUCCESS);
    }

    // Signal-terminated children carry no exit code; report plain failure.
    Ok(message.exit_code.unwrap_or(exit_codes::USER_ERROR))
}

fn cmd_preview(args: PreviewArgs) -> Result<i32> {
    let runner = resolve_runner(
        args.profile.as_deref(),
        &args.config,
        args.command.as_deref(),
        &args.arguments,
    )?;
    let values: Interpolations = parse_pairs(&args.set, "--set")?.into_iter().collect();

    let (command, arguments) = runner.contents(&values);
    if arguments.is_empty() {
        println!("{command}");
    } else {
        println!("{command} {arguments}");
    }
    Ok(exit_codes::SUCCESS)
}

fn cmd_backends() -> Result<i32> {
    let default = default_backend();
    let variants: [Arc<dyn Backend>; 4] = [
        Arc::new(PosixSpawn),
        Arc::new(Spawn),
        Arc::new(Backticks),
        Arc::new(Fake),
    ];
    for backend in variants {
        let availability = if backend.available() {
            "available"
        } else {
            "unavailable"
        };
        let marker = if backend.name() == default.name() {
            "  (default)"
        } else {
            ""
        };
        println!("{:<12} {availability}{marker}", backend.name());
    }
    Ok(exit_codes::SUCCESS)
}

/// Build the runner from a profile or from the positional command.
fn resolve_runner(
    profile: Option<&str>,
    config_path: &Path,
    command: Option<&str>,
    arguments: &str,
) -> Result<Runner> {
    match profile {
        Some(name) => {
            let config = Config::load(config_path)?;
            Ok(config.profile(name)?.to_runner())
        }
        None => {
            let command = command.ok_or_else(|| {
                RunnerError::Config("no command given and no --profile selected".to_string())
            })?;
            Ok(Runner::new(command, arguments))
        }
    }
}

/// Map a CLI backend choice to an instance override; `Auto` keeps the
/// process-wide default. An explicitly chosen variant must be available.
fn backend_for(choice: BackendChoice) -> Result<Option<Arc<dyn Backend>>> {
    let backend: Arc<dyn Backend> = match choice {
        BackendChoice::Auto => return Ok(None),
        BackendChoice::Fake => Arc::new(Fake),
        BackendChoice::Backticks => Arc::new(Backticks),
        BackendChoice::Spawn => Arc::new(Spawn),
        BackendChoice::PosixSpawn => Arc::new(PosixSpawn),
    };
    if !backend.available() {
        return Err(RunnerError::UnavailableBackend(backend.name()));
    }
    Ok(Some(backend))
}

/// Parse repeated `KEY=VALUE` flag values.
fn parse_pairs(pairs: &[String], flag: &str) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| {
                    RunnerError::Config(format!(
                        "malformed {flag} value '{pair}'\n\
                         Fix: use {flag} KEY=VALUE."
                    ))
                })
        })
        .collect()
}
