//! A backend that does not execute anything.

use super::Backend;
use crate::error::Result;
use crate::message::Message;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// No-op backend for dry runs and tests, and the last-resort fallback when
/// no real variant is available. Echoes its inputs back in an unexecuted
/// [`Message`] without touching the filesystem or the process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fake;

impl Fake {
    /// Create a fake backend.
    pub const fn new() -> Self {
        Self
    }
}

impl Backend for Fake {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn available(&self) -> bool {
        true
    }

    fn execute(
        &self,
        _command: &str,
        _arguments: &str,
        env: &HashMap<String, String>,
        options: &Map<String, Value>,
    ) -> Result<Message> {
        Ok(Message::unexecuted(env.clone(), options.clone()))
    }
}
