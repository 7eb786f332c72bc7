//! Logger that prints to stderr

use super::traits::{Level, Logger};

/// Writes prefixed lines to stderr
///
/// Used by the interactive `chat` command, where stdout carries the
/// conversation itself. Debug lines are dropped unless enabled.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    debug: bool,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self::with_prefix("[kubebridge]")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            debug: false,
        }
    }

    /// Also print debug lines
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    fn line(&self, level: Level, message: &str) -> String {
        format!("{} {}: {}", self.prefix, level, message)
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        if self.debug {
            eprintln!("{}", self.line(Level::Debug, message));
        }
    }

    fn info(&self, message: &str) {
        eprintln!("{}", self.line(Level::Info, message));
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", self.line(Level::Warn, message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.line(Level::Error, message));
    }
}
