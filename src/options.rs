//! Run options: a typed environment plus backend-specific extras.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Options for a run: the child environment, kept in its own field, and a
/// free-form extension map of backend-specific settings.
///
/// The extension keys recognized by the spawn backends are `stdout`,
/// `stderr`, and `stdin` (values `"piped"`, `"null"`, `"inherit"`) and `cwd`
/// (a directory path). Unknown keys are ignored, so option maps stay
/// forward-compatible.
///
/// A [`Runner`](crate::runner::Runner) holds a default `RunOptions`;
/// per-call options are merged over it with [`merged`](Self::merged), never
/// mutating either input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Environment variables applied to the child process.
    #[serde(default)]
    pub environment: HashMap<String, String>,
    /// Backend-specific options.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Builder-style extension option.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// A new `RunOptions` with `overrides` applied over `self`, key by key.
    pub fn merged(&self, overrides: &RunOptions) -> RunOptions {
        let mut merged = self.clone();
        for (key, value) in &overrides.environment {
            merged.environment.insert(key.clone(), value.clone());
        }
        for (key, value) in &overrides.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }
}
