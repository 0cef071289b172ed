//! Shell-capture backend.

use super::{wall_clock_elapsed, Backend};
use crate::error::{Result, RunnerError};
use crate::message::Message;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::process::{Command, Stdio};
use std::time::SystemTime;

/// Backend that hands the whole line to a shell and captures stdout.
///
/// The command and argument string are joined with a single space and run
/// as `sh -c "<line>"`; no additional quoting is applied here, the
/// interpolation layer is responsible for escaping the pieces. The `env`
/// mapping is applied to the process environment for the duration of the
/// call and restored afterward whether or not the run succeeds.
///
/// The process environment is shared by every thread, so concurrent
/// `execute` calls that both override variables must be serialized by the
/// caller; this backend only guarantees scoped apply/restore for a single
/// call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backticks;

impl Backticks {
    /// Create a shell-capture backend.
    pub const fn new() -> Self {
        Self
    }
}

impl Backend for Backticks {
    fn name(&self) -> &'static str {
        "backticks"
    }

    fn available(&self) -> bool {
        cfg!(unix)
    }

    fn execute(
        &self,
        command: &str,
        arguments: &str,
        env: &HashMap<String, String>,
        _options: &Map<String, Value>,
    ) -> Result<Message> {
        let line = format!("{command} {arguments}");

        let guard = EnvGuard::apply(env);
        let start = SystemTime::now();
        let child = Command::new("sh")
            .arg("-c")
            .arg(&line)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                command: command.to_string(),
                source,
            })?;
        let pid = child.id();
        let output = child
            .wait_with_output()
            .map_err(|source| RunnerError::Wait { pid, source })?;
        let end = SystemTime::now();
        drop(guard);

        Ok(Message {
            process_id: Some(pid),
            exit_code: output.status.code(),
            executed: true,
            finished: true,
            elapsed: Some(wall_clock_elapsed(start, end)),
            env: env.clone(),
            options: Map::new(),
            stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            raw_status: Some(output.status),
        })
    }
}

/// Scoped override of process environment variables.
///
/// Records each variable's prior state on apply and restores it on drop,
/// including removing variables that were previously unset.
struct EnvGuard {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvGuard {
    fn apply(env: &HashMap<String, String>) -> Self {
        let mut saved = Vec::with_capacity(env.len());
        for (key, value) in env {
            saved.push((key.clone(), env::var_os(key)));
            // SAFETY: mutating the process environment is racy across
            // threads; callers of this backend serialize overriding calls.
            unsafe { env::set_var(key, value) };
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..) {
            // SAFETY: same single-writer discipline as in `apply`.
            unsafe {
                match previous {
                    Some(value) => env::set_var(&key, value),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}
