//! Logger that forwards to the `tracing` crate

use super::traits::Logger;

/// Forwards every message as a `tracing` event under a fixed target.
///
/// Filtering and formatting are left to the installed subscriber
/// (`RUST_LOG=kubebridge=debug` and so on).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "kubebridge", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "kubebridge", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "kubebridge", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "kubebridge", "{}", message);
    }
}
