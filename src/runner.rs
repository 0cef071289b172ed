//! The runner façade: template + command + options, executed on demand.

use crate::backend::{default_backend, Backend};
use crate::error::Result;
use crate::interpolate::{interpolate, Interpolations};
use crate::message::Message;
use crate::options::RunOptions;
use std::sync::Arc;

/// A reusable command with a templated argument string.
///
/// The command and template are fixed at construction; each [`run`](Self::run)
/// interpolates the template with that call's values, resolves a backend
/// (instance override first, then the process-wide default), and blocks
/// until the child terminates. Nothing is carried over between calls.
///
/// # Examples
///
/// ```
/// use runnel::{backend::Fake, Interpolations, Runner};
/// use std::sync::Arc;
///
/// let runner = Runner::new("echo", "hello {name}").with_backend(Arc::new(Fake));
/// let values = Interpolations::from([("name", "world & friends")]);
///
/// let (command, arguments) = runner.contents(&values);
/// assert_eq!(command, "echo");
/// assert_eq!(arguments, "hello 'world & friends'");
///
/// let message = runner.run(&values).unwrap();
/// assert!(!message.executed);
/// ```
#[derive(Debug, Clone)]
pub struct Runner {
    command: String,
    arguments: String,
    options: RunOptions,
    backend: Option<Arc<dyn Backend>>,
}

impl Runner {
    /// Create a runner with empty default options.
    pub fn new(command: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self::with_options(command, arguments, RunOptions::new())
    }

    /// Create a runner with default options applied to every run.
    pub fn with_options(
        command: impl Into<String>,
        arguments: impl Into<String>,
        options: RunOptions,
    ) -> Self {
        Self {
            command: command.into(),
            arguments: arguments.into(),
            options,
            backend: None,
        }
    }

    /// The command this runner invokes.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The argument template this runner interpolates.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// A copy of the default options. The runner's own copy is never
    /// exposed, so callers cannot mutate it.
    pub fn options(&self) -> RunOptions {
        self.options.clone()
    }

    /// The backend this runner will execute with: the instance override if
    /// one was set, otherwise the process-wide default.
    pub fn backend(&self) -> Arc<dyn Backend> {
        match &self.backend {
            Some(backend) => Arc::clone(backend),
            None => default_backend(),
        }
    }

    /// Set an instance-local backend override.
    pub fn set_backend(&mut self, backend: Arc<dyn Backend>) {
        self.backend = Some(backend);
    }

    /// Builder-style [`set_backend`](Self::set_backend).
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.set_backend(backend);
        self
    }

    /// The command line that would run, without running it: the command and
    /// the argument template interpolated with `values`.
    pub fn contents(&self, values: &Interpolations) -> (String, String) {
        (
            self.command.clone(),
            interpolate(&self.arguments, values),
        )
    }

    /// Interpolate and execute with the runner's default options.
    pub fn run(&self, values: &Interpolations) -> Result<Message> {
        self.run_with_options(values, &RunOptions::new())
    }

    /// Interpolate and execute, merging `overrides` over the runner's
    /// default options for this call only.
    pub fn run_with_options(
        &self,
        values: &Interpolations,
        overrides: &RunOptions,
    ) -> Result<Message> {
        let merged = self.options.merged(overrides);
        let (command, arguments) = self.contents(values);
        self.backend()
            .execute(&command, &arguments, &merged.environment, &merged.extra)
    }
}
