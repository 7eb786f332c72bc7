//! Silent logger

use std::sync::Arc;

use super::traits::{Logger, SharedLogger};

/// Discards every message; the default for tests and embedded use
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    /// Shared handle ready to inject into a router or provider
    pub fn shared() -> SharedLogger {
        Arc::new(Self)
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_handle_accepts_macros() {
        let logger = NoOpLogger::shared();
        crate::log_debug!(logger, "translated {} calls", 3);
        crate::log_warn!(logger, "backend {} slow", "kubectl");
    }
}
