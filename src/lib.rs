//! Templated command execution with pluggable process backends.
//!
//! A [`Runner`] pairs a command with an argument template. On each run the
//! template's placeholders are substituted from caller-supplied values -
//! `{name}` shell-escaped, `{{name}}` raw - and the resulting command line
//! is handed to an execution backend, which blocks until the child
//! terminates and reports a structured [`Message`] (pid, exit code, timing,
//! captured output).
//!
//! Backends are interchangeable implementations of [`Backend`]:
//! `posix_spawnp` on unix, native spawn, shell capture, or a fake for dry
//! runs. The best available variant is selected once per process and can be
//! overridden globally or per runner.
//!
//! A child that runs and exits non-zero is a result, not an error; errors
//! are reserved for commands that never meaningfully ran.
//!
//! # Examples
//!
//! ```
//! use runnel::{interpolate, Interpolations};
//!
//! let values = Interpolations::from([("dir", "My Documents")]);
//! assert_eq!(interpolate("ls {dir}", &values), "ls 'My Documents'");
//! ```
//!
//! Running for real uses the best backend for the platform:
//!
//! ```no_run
//! use runnel::{Interpolations, Runner};
//!
//! let runner = Runner::new("echo", "hello {name}");
//! let message = runner.run(&Interpolations::from([("name", "world")]))?;
//! assert!(message.executed);
//! # Ok::<(), runnel::RunnerError>(())
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod escape;
pub mod exit_codes;
pub mod interpolate;
pub mod message;
pub mod options;
pub mod runner;

pub use backend::{
    best_backend, default_backend, reset_default_backend, set_default_backend, Backend,
};
pub use error::{Result, RunnerError};
pub use escape::escape;
pub use interpolate::{interpolate, Interpolations};
pub use message::Message;
pub use options::RunOptions;
pub use runner::Runner;
