//! Posix-spawn backend.
//!
//! Uses `posix_spawnp(3)` directly instead of fork/exec, which is the
//! cheaper process-creation path on platforms that provide it. Unix only;
//! on other platforms the variant reports itself unavailable.

use super::Backend;
use crate::error::{Result, RunnerError};
use crate::message::Message;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Backend that spawns through the host's `posix_spawnp` primitive.
///
/// Like [`Spawn`](super::Spawn) it splits the argument string with
/// shell-word rules and execs directly, no shell. The primitive offers no
/// capture mechanism here, so stdout is never captured and stdio is
/// inherited; the environment block is built explicitly from the current
/// process environment overlaid with the call's `env` mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixSpawn;

impl PosixSpawn {
    /// Create a posix-spawn backend.
    pub const fn new() -> Self {
        Self
    }
}

impl Backend for PosixSpawn {
    fn name(&self) -> &'static str {
        "posix-spawn"
    }

    fn available(&self) -> bool {
        cfg!(unix)
    }

    fn execute(
        &self,
        command: &str,
        arguments: &str,
        env: &HashMap<String, String>,
        options: &Map<String, Value>,
    ) -> Result<Message> {
        #[cfg(unix)]
        {
            unix_impl::execute(command, arguments, env, options)
        }
        #[cfg(not(unix))]
        {
            let _ = (command, arguments, env, options);
            Err(RunnerError::UnavailableBackend(self.name()))
        }
    }
}

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use crate::backend::wall_clock_elapsed;
    use std::collections::BTreeMap;
    use std::env as process_env;
    use std::ffi::{CString, OsString};
    use std::io;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;
    use std::ptr;
    use std::time::SystemTime;

    pub(super) fn execute(
        command: &str,
        arguments: &str,
        env: &HashMap<String, String>,
        options: &Map<String, Value>,
    ) -> Result<Message> {
        let args = shell_words::split(arguments).map_err(|source| RunnerError::ArgumentSplit {
            arguments: arguments.to_string(),
            source,
        })?;

        let mut argv_owned = Vec::with_capacity(args.len() + 1);
        argv_owned.push(c_string(command.as_bytes().to_vec(), command)?);
        for arg in args {
            argv_owned.push(c_string(arg.into_bytes(), command)?);
        }
        let envp_owned = environment_block(env, command)?;

        let argv = raw_vector(&argv_owned);
        let envp = raw_vector(&envp_owned);

        let mut pid: libc::pid_t = 0;
        let start = SystemTime::now();
        // SAFETY: argv and envp are null-terminated pointer arrays into
        // CStrings that stay alive until after the call returns.
        let rc = unsafe {
            libc::posix_spawnp(
                &mut pid,
                argv_owned[0].as_ptr(),
                ptr::null(),
                ptr::null(),
                argv.as_ptr(),
                envp.as_ptr(),
            )
        };
        if rc != 0 {
            return Err(RunnerError::Spawn {
                command: command.to_string(),
                source: io::Error::from_raw_os_error(rc),
            });
        }

        let mut raw: libc::c_int = 0;
        loop {
            // SAFETY: pid names the child just created above.
            let waited = unsafe { libc::waitpid(pid, &mut raw, 0) };
            if waited == pid {
                break;
            }
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            return Err(RunnerError::Wait {
                pid: pid as u32,
                source: err,
            });
        }
        let end = SystemTime::now();

        let status = ExitStatus::from_raw(raw);
        Ok(Message {
            process_id: Some(pid as u32),
            exit_code: status.code(),
            executed: true,
            finished: true,
            elapsed: Some(wall_clock_elapsed(start, end)),
            env: env.clone(),
            options: options.clone(),
            stdout: None,
            raw_status: Some(status),
        })
    }

    fn c_string(bytes: Vec<u8>, command: &str) -> Result<CString> {
        CString::new(bytes).map_err(|source| RunnerError::Spawn {
            command: command.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, source),
        })
    }

    /// Current process environment overlaid with the call's overrides,
    /// rendered as `KEY=VALUE` strings for `posix_spawnp`.
    fn environment_block(
        env: &HashMap<String, String>,
        command: &str,
    ) -> Result<Vec<CString>> {
        let mut merged: BTreeMap<OsString, OsString> = process_env::vars_os().collect();
        for (key, value) in env {
            merged.insert(OsString::from(key), OsString::from(value));
        }

        let mut block = Vec::with_capacity(merged.len());
        for (key, value) in merged {
            let mut entry = Vec::with_capacity(key.len() + value.len() + 1);
            entry.extend_from_slice(key.as_bytes());
            entry.push(b'=');
            entry.extend_from_slice(value.as_bytes());
            block.push(c_string(entry, command)?);
        }
        Ok(block)
    }

    fn raw_vector(owned: &[CString]) -> Vec<*mut libc::c_char> {
        let mut raw: Vec<*mut libc::c_char> = owned
            .iter()
            .map(|s| s.as_ptr() as *mut libc::c_char)
            .collect();
        raw.push(ptr::null_mut());
        raw
    }
}
