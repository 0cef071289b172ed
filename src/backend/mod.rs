//! Execution backends and process-wide backend selection.
//!
//! A backend turns a `(command, arguments, env, options)` quadruple into a
//! [`Message`]. The set of variants is small and closed:
//!
//! - [`PosixSpawn`] - `posix_spawnp(3)` via libc, unix only
//! - [`Spawn`] - `std::process::Command`, no shell
//! - [`Backticks`] - `sh -c`, captures stdout
//! - [`Fake`] - no real execution, for dry runs and tests
//!
//! [`best_backend`] probes the spawn variants in that priority order and
//! degrades to [`Fake`]; [`default_backend`] memoizes that probe
//! process-wide until [`set_default_backend`] or [`reset_default_backend`]
//! replaces it.

mod backticks;
mod fake;
mod posix;
mod spawn;

pub use backticks::Backticks;
pub use fake::Fake;
pub use posix::PosixSpawn;
pub use spawn::Spawn;

use crate::error::Result;
use crate::message::Message;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

/// A strategy for running a command line and producing a [`Message`].
///
/// Backend values hold no per-call state: one instance may serve concurrent
/// calls from independent call sites. The one shared resource is the process
/// environment, which [`Backticks`] temporarily overrides during a call;
/// concurrent env-overriding calls through that backend must be serialized
/// by the caller.
pub trait Backend: fmt::Debug + Send + Sync {
    /// Stable identifier used in errors and CLI output.
    fn name(&self) -> &'static str;

    /// Whether this variant can execute on the current platform.
    /// Side-effect-free and safe to call repeatedly.
    fn available(&self) -> bool;

    /// Run `command` with the already-interpolated `arguments` under `env`,
    /// blocking until the child terminates.
    ///
    /// A non-zero exit is reported in the returned [`Message`], never as an
    /// error; `Err` means the command never meaningfully ran.
    fn execute(
        &self,
        command: &str,
        arguments: &str,
        env: &HashMap<String, String>,
        options: &Map<String, Value>,
    ) -> Result<Message>;
}

/// Probe the real variants in priority order and return the first available,
/// falling back to [`Fake`].
pub fn best_backend() -> Arc<dyn Backend> {
    if PosixSpawn.available() {
        Arc::new(PosixSpawn)
    } else if Spawn.available() {
        Arc::new(Spawn)
    } else {
        Arc::new(Fake)
    }
}

static DEFAULT_BACKEND: RwLock<Option<Arc<dyn Backend>>> = RwLock::new(None);

/// The process-wide default backend.
///
/// Computed from [`best_backend`] at most once, on first use, then reused;
/// concurrent first callers race only for who fills the slot, never for
/// duplicate slots. [`set_default_backend`] and [`reset_default_backend`]
/// are the explicit override and reset operations.
pub fn default_backend() -> Arc<dyn Backend> {
    let slot = DEFAULT_BACKEND
        .read()
        .unwrap_or_else(|poison| poison.into_inner());
    if let Some(backend) = slot.as_ref() {
        return Arc::clone(backend);
    }
    drop(slot);

    let mut slot = DEFAULT_BACKEND
        .write()
        .unwrap_or_else(|poison| poison.into_inner());
    if let Some(backend) = slot.as_ref() {
        return Arc::clone(backend);
    }
    let backend = best_backend();
    *slot = Some(Arc::clone(&backend));
    backend
}

/// Replace the process-wide default backend.
pub fn set_default_backend(backend: Arc<dyn Backend>) {
    let mut slot = DEFAULT_BACKEND
        .write()
        .unwrap_or_else(|poison| poison.into_inner());
    *slot = Some(backend);
}

/// Clear the process-wide default so the next [`default_backend`] call
/// re-probes. Intended for tests.
pub fn reset_default_backend() {
    let mut slot = DEFAULT_BACKEND
        .write()
        .unwrap_or_else(|poison| poison.into_inner());
    *slot = None;
}

/// Absolute wall-clock difference between two samples.
///
/// `SystemTime` is not monotonic; a clock that steps backwards mid-run
/// yields the magnitude of the difference rather than an error.
pub(crate) fn wall_clock_elapsed(start: SystemTime, end: SystemTime) -> Duration {
    end.duration_since(start).unwrap_or_else(|err| err.duration())
}
