//! Native spawn backend built on `std::process::Command`.

use super::{wall_clock_elapsed, Backend};
use crate::error::{Result, RunnerError};
use crate::message::Message;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::time::SystemTime;

/// Backend that execs the command directly, without a shell.
///
/// The argument string is split into discrete tokens with shell-word rules
/// before spawning, so shell metacharacters in arguments are never
/// interpreted. Stdout is not captured unless the options ask for it.
///
/// Recognized options: `stdout`, `stderr`, `stdin` with values `"piped"`,
/// `"null"`, or `"inherit"`, and `cwd` naming the child's working
/// directory. Unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spawn;

impl Spawn {
    /// Create a native spawn backend.
    pub const fn new() -> Self {
        Self
    }
}

fn stdio_option(options: &Map<String, Value>, key: &str) -> Option<Stdio> {
    match options.get(key).and_then(Value::as_str) {
        Some("piped") => Some(Stdio::piped()),
        Some("null") => Some(Stdio::null()),
        Some("inherit") => Some(Stdio::inherit()),
        _ => None,
    }
}

impl Backend for Spawn {
    fn name(&self) -> &'static str {
        "spawn"
    }

    fn available(&self) -> bool {
        true
    }

    fn execute(
        &self,
        command: &str,
        arguments: &str,
        env: &HashMap<String, String>,
        options: &Map<String, Value>,
    ) -> Result<Message> {
        let args = shell_words::split(arguments).map_err(|source| RunnerError::ArgumentSplit {
            arguments: arguments.to_string(),
            source,
        })?;

        let mut cmd = Command::new(command);
        cmd.args(&args).envs(env);
        if let Some(dir) = options.get("cwd").and_then(Value::as_str) {
            cmd.current_dir(dir);
        }
        if let Some(io) = stdio_option(options, "stdout") {
            cmd.stdout(io);
        }
        if let Some(io) = stdio_option(options, "stderr") {
            cmd.stderr(io);
        }
        if let Some(io) = stdio_option(options, "stdin") {
            cmd.stdin(io);
        }
        let capture = matches!(options.get("stdout").and_then(Value::as_str), Some("piped"));

        let start = SystemTime::now();
        let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            command: command.to_string(),
            source,
        })?;
        let pid = child.id();

        let (status, stdout) = if capture {
            let output = child
                .wait_with_output()
                .map_err(|source| RunnerError::Wait { pid, source })?;
            let text = String::from_utf8_lossy(&output.stdout).into_owned();
            (output.status, Some(text))
        } else {
            let status = child
                .wait()
                .map_err(|source| RunnerError::Wait { pid, source })?;
            (status, None)
        };
        let end = SystemTime::now();

        Ok(Message {
            process_id: Some(pid),
            exit_code: status.code(),
            executed: true,
            finished: true,
            elapsed: Some(wall_clock_elapsed(start, end)),
            env: env.clone(),
            options: options.clone(),
            stdout,
            raw_status: Some(status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piped() -> Map<String, Value> {
        let mut options = Map::new();
        options.insert("stdout".to_string(), "piped".into());
        options
    }

    #[test]
    fn spawn_is_always_available() {
        assert!(Spawn.available());
    }

    #[test]
    fn nonexistent_command_is_a_spawn_error() {
        let err = Spawn
            .execute("runnel-no-such-command-xyz", "", &HashMap::new(), &Map::new())
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }

    #[test]
    fn unbalanced_quotes_are_an_argument_error() {
        let err = Spawn
            .execute("echo", "\"unclosed", &HashMap::new(), &Map::new())
            .unwrap_err();
        assert!(matches!(err, RunnerError::ArgumentSplit { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn reports_real_exit_codes() {
            let ok = Spawn
                .execute("true", "", &HashMap::new(), &Map::new())
                .unwrap();
            assert_eq!(ok.exit_code, Some(0));
            assert!(ok.executed && ok.finished);
            assert!(ok.process_id.is_some());
            assert!(ok.elapsed.is_some());

            let failed = Spawn
                .execute("false", "", &HashMap::new(), &Map::new())
                .unwrap();
            assert_eq!(failed.exit_code, Some(1));
            assert!(failed.executed);
        }

        #[test]
        fn does_not_capture_stdout_by_default() {
            let msg = Spawn
                .execute("echo", "quiet", &HashMap::new(), &Map::new())
                .unwrap();
            assert_eq!(msg.stdout, None);
        }

        #[test]
        fn captures_stdout_when_piped_is_requested() {
            let msg = Spawn
                .execute("echo", "loud", &HashMap::new(), &piped())
                .unwrap();
            assert_eq!(msg.stdout.as_deref(), Some("loud\n"));
            assert_eq!(msg.options, piped());
        }

        #[test]
        fn splits_arguments_with_shell_word_rules() {
            let msg = Spawn
                .execute("echo", "'a b' c", &HashMap::new(), &piped())
                .unwrap();
            assert_eq!(msg.stdout.as_deref(), Some("a b c\n"));
        }

        #[test]
        fn metacharacters_are_not_interpreted() {
            let msg = Spawn
                .execute("echo", "'one && echo two'", &HashMap::new(), &piped())
                .unwrap();
            assert_eq!(msg.stdout.as_deref(), Some("one && echo two\n"));
        }

        #[test]
        fn merges_environment_into_the_child() {
            let mut env = HashMap::new();
            env.insert("RUNNEL_SPAWN_VAR".to_string(), "merged".to_string());
            let msg = Spawn
                .execute("printenv", "RUNNEL_SPAWN_VAR", &env, &piped())
                .unwrap();
            assert_eq!(msg.stdout.as_deref(), Some("merged\n"));
        }

        #[test]
        fn honors_the_cwd_option() {
            let dir = TempDir::new().unwrap();
            let canonical = dir.path().canonicalize().unwrap();
            let mut options = piped();
            options.insert("cwd".to_string(), canonical.to_str().unwrap().into());

            let msg = Spawn
                .execute("pwd", "", &HashMap::new(), &options)
                .unwrap();
            assert_eq!(msg.stdout.as_deref().map(str::trim), canonical.to_str());
        }
    }
}
