//! Structured result of one execution attempt.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::process::ExitStatus;
use std::time::Duration;

/// Information about a process run (or a run that never happened).
///
/// A `Message` is produced by a backend in one step, after the child has
/// terminated; no partially-populated message is ever observable. A message
/// with `executed == true` is authoritative regardless of `exit_code` -
/// callers decide what a non-zero exit means. Only a returned
/// [`RunnerError`](crate::error::RunnerError) indicates the command never
/// meaningfully ran.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Platform process identifier. Absent if never executed.
    pub process_id: Option<u32>,
    /// Exit code of the process. Absent until finished, and absent for
    /// signal-terminated children.
    pub exit_code: Option<i32>,
    /// Whether the backend actually attempted to start the process.
    pub executed: bool,
    /// Whether the backend observed process completion.
    pub finished: bool,
    /// Wall-clock execution time. Absent until finished.
    pub elapsed: Option<Duration>,
    /// The environment mapping the backend applied.
    pub env: HashMap<String, String>,
    /// The backend-specific options the backend actually used.
    pub options: Map<String, Value>,
    /// Captured standard output. Only the shell-capture backend guarantees
    /// capture; the spawn backends capture on request.
    pub stdout: Option<String>,
    /// Backend-native status handle, for inspection by advanced callers.
    #[serde(skip)]
    pub raw_status: Option<ExitStatus>,
}

impl Message {
    /// A message for a command that was never started, echoing back the
    /// environment and options it would have used.
    pub fn unexecuted(env: HashMap<String, String>, options: Map<String, Value>) -> Self {
        Self {
            process_id: None,
            exit_code: None,
            executed: false,
            finished: false,
            elapsed: None,
            env,
            options,
            stdout: None,
            raw_status: None,
        }
    }

    /// Whether the process ran and exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
