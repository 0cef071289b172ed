//! Profile configuration for the runnel CLI.
//!
//! A profile file (`runnel.yaml` by default) names reusable command
//! definitions. Parsing is forward-compatible: unknown fields are ignored
//! and optional fields default sensibly.
//!
//! ```yaml
//! profiles:
//!   greet:
//!     command: echo
//!     arguments: "hello {name}"
//!     environment:
//!       GREETING: casual
//!     options:
//!       stdout: piped
//! ```

use crate::error::{Result, RunnerError};
use crate::options::RunOptions;
use crate::runner::Runner;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// The parsed profile file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Named command profiles.
    #[serde(default)]
    pub profiles: HashMap<String, CommandProfile>,
}

/// One reusable command definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandProfile {
    /// The executable to invoke.
    pub command: String,
    /// Argument template, may contain `{name}` and `{{name}}` placeholders.
    #[serde(default)]
    pub arguments: String,
    /// Environment variables for the child process.
    #[serde(default)]
    pub environment: HashMap<String, String>,
    /// Backend-specific options.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl Config {
    /// Load and parse a profile file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RunnerError::Config(format!(
                "failed to read profile file '{}': {}\n\
                 Fix: create the file or pass --config with the right path.",
                path.display(),
                e
            ))
        })?;
        serde_yaml::from_str(&text).map_err(|e| {
            RunnerError::Config(format!(
                "failed to parse profile file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Look up a profile by name, listing the available names on a miss.
    pub fn profile(&self, name: &str) -> Result<&CommandProfile> {
        self.profiles.get(name).ok_or_else(|| {
            let mut names: Vec<_> = self.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            RunnerError::Config(format!(
                "unknown profile '{}'\n\
                 Available profiles: {}",
                name,
                if names.is_empty() {
                    "(none)".to_string()
                } else {
                    names.join(", ")
                }
            ))
        })
    }
}

impl CommandProfile {
    /// Build a [`Runner`] carrying this profile's environment and options as
    /// defaults.
    pub fn to_runner(&self) -> Runner {
        let options = RunOptions {
            environment: self.environment.clone(),
            extra: self.options.clone(),
        };
        Runner::with_options(&self.command, &self.arguments, options)
    }
}
