//! Error types for runnel.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//!
//! A child process that runs and exits non-zero is NOT an error: it is
//! reported as data on [`crate::message::Message`]. The variants here cover
//! the cases where a command never meaningfully ran.

use crate::exit_codes;
use std::io;
use thiserror::Error;

/// Main error type for runnel operations.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// A backend was invoked explicitly but is not usable on this platform.
    ///
    /// Automatic selection never produces this: it skips unavailable
    /// variants and degrades to the fake backend instead.
    #[error("backend '{0}' is not available on this platform")]
    UnavailableBackend(&'static str),

    /// The argument string could not be split into shell words.
    #[error("failed to parse arguments '{arguments}': {source}")]
    ArgumentSplit {
        /// The argument string that failed to parse.
        arguments: String,
        /// The underlying parse error.
        #[source]
        source: shell_words::ParseError,
    },

    /// The OS refused to create the process (command not found,
    /// permission denied, ...).
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        /// The command that could not be started.
        command: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The OS failed while waiting on a child that was already started.
    #[error("failed to wait on process {pid}: {source}")]
    Wait {
        /// The child process id.
        pid: u32,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// User-facing configuration or CLI input problem.
    #[error("{0}")]
    Config(String),
}

impl RunnerError {
    /// Returns the appropriate CLI exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Config(_) | RunnerError::ArgumentSplit { .. } => exit_codes::USER_ERROR,
            RunnerError::UnavailableBackend(_) => exit_codes::UNAVAILABLE_BACKEND,
            RunnerError::Spawn { .. } | RunnerError::Wait { .. } => exit_codes::SPAWN_FAILURE,
        }
    }
}

/// Result type alias for runnel operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_has_user_error_exit_code() {
        let err = RunnerError::Config("bad profile".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn unavailable_backend_has_correct_exit_code() {
        let err = RunnerError::UnavailableBackend("posix-spawn");
        assert_eq!(err.exit_code(), exit_codes::UNAVAILABLE_BACKEND);
    }

    #[test]
    fn spawn_failure_has_correct_exit_code() {
        let err = RunnerError::Spawn {
            command: "nope".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.exit_code(), exit_codes::SPAWN_FAILURE);
    }

    #[test]
    fn argument_split_is_a_user_error() {
        let source = shell_words::split("\"unclosed").unwrap_err();
        let err = RunnerError::ArgumentSplit {
            arguments: "\"unclosed".to_string(),
            source,
        };
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = RunnerError::UnavailableBackend("posix-spawn");
        assert_eq!(
            err.to_string(),
            "backend 'posix-spawn' is not available on this platform"
        );

        let err = RunnerError::Spawn {
            command: "frobnicate".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("failed to spawn 'frobnicate'"));
    }
}
