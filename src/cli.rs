//! CLI argument parsing for runnel.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Runnel: templated command execution with pluggable process backends.
///
/// Argument templates may contain `{name}` placeholders (substituted with
/// the shell-escaped value) and `{{name}}` placeholders (substituted raw).
#[derive(Parser, Debug)]
#[command(name = "runnel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse arguments from the process command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for runnel.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command with interpolated arguments.
    ///
    /// Exits with the child's exit code once the child terminates.
    Run(RunArgs),

    /// Print the command line that would run, without executing it.
    Preview(PreviewArgs),

    /// List execution backends, their availability, and the default.
    Backends,
}

/// Which backend to execute with.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Best available: posix-spawn, then spawn, then fake.
    Auto,
    /// Dry run; nothing is executed.
    Fake,
    /// Through the shell, capturing stdout.
    Backticks,
    /// Native spawn, no shell.
    Spawn,
    /// posix_spawnp(3), unix only.
    PosixSpawn,
}

/// Arguments for `runnel run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// The executable to run (or use --profile).
    #[arg(required_unless_present = "profile")]
    pub command: Option<String>,

    /// Argument template for the command.
    #[arg(default_value = "", allow_hyphen_values = true)]
    pub arguments: String,

    /// Run a named profile from the config file instead.
    #[arg(long, conflicts_with = "command")]
    pub profile: Option<String>,

    /// Path to the profile file.
    #[arg(long, value_name = "FILE", default_value = "runnel.yaml")]
    pub config: PathBuf,

    /// Interpolation value, repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", action = ArgAction::Append)]
    pub set: Vec<String>,

    /// Environment variable for the child, repeatable.
    #[arg(long = "env", value_name = "KEY=VALUE", action = ArgAction::Append)]
    pub env: Vec<String>,

    /// Backend to execute with.
    #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
    pub backend: BackendChoice,

    /// Capture the child's stdout and print it after the run.
    #[arg(long)]
    pub capture: bool,

    /// Working directory for the child.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for `runnel preview`.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// The executable that would run (or use --profile).
    #[arg(required_unless_present = "profile")]
    pub command: Option<String>,

    /// Argument template for the command.
    #[arg(default_value = "", allow_hyphen_values = true)]
    pub arguments: String,

    /// Preview a named profile from the config file instead.
    #[arg(long, conflicts_with = "command")]
    pub profile: Option<String>,

    /// Path to the profile file.
    #[arg(long, value_name = "FILE", default_value = "runnel.yaml")]
    pub config: PathBuf,

    /// Interpolation value, repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", action = ArgAction::Append)]
    pub set: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_sets_and_env() {
        let cli = Cli::try_parse_from([
            "runnel", "run", "echo", "hello {name}", "--set", "name=world", "--env",
            "LANG=C", "--capture",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.command.as_deref(), Some("echo"));
                assert_eq!(args.arguments, "hello {name}");
                assert_eq!(args.set, vec!["name=world"]);
                assert_eq!(args.env, vec!["LANG=C"]);
                assert!(args.capture);
                assert_eq!(args.backend, BackendChoice::Auto);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn run_requires_a_command_or_a_profile() {
        assert!(Cli::try_parse_from(["runnel", "run"]).is_err());
        assert!(Cli::try_parse_from(["runnel", "run", "--profile", "greet"]).is_ok());
    }

    #[test]
    fn profile_conflicts_with_positional_command() {
        let result = Cli::try_parse_from(["runnel", "run", "echo", "--profile", "greet"]);
        assert!(result.is_err());
    }

    #[test]
    fn backend_flag_accepts_each_variant() {
        for (flag, expected) in [
            ("auto", BackendChoice::Auto),
            ("fake", BackendChoice::Fake),
            ("backticks", BackendChoice::Backticks),
            ("spawn", BackendChoice::Spawn),
            ("posix-spawn", BackendChoice::PosixSpawn),
        ] {
            let cli =
                Cli::try_parse_from(["runnel", "run", "true", "--backend", flag]).unwrap();
            match cli.command {
                Command::Run(args) => assert_eq!(args.backend, expected),
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    #[test]
    fn parses_preview_and_backends() {
        assert!(matches!(
            Cli::try_parse_from(["runnel", "preview", "echo", "{x}"])
                .unwrap()
                .command,
            Command::Preview(_)
        ));
        assert!(matches!(
            Cli::try_parse_from(["runnel", "backends"]).unwrap().command,
            Command::Backends
        ));
    }
}
