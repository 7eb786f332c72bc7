//! Logger trait and formatting macros

use std::fmt;
use std::sync::Arc;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// Sink injected into the router, assistant and providers
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Route a message by level
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => self.debug(message),
            Level::Info => self.info(message),
            Level::Warn => self.warn(message),
            Level::Error => self.error(message),
        }
    }
}

pub type SharedLogger = Arc<dyn Logger>;

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Debug, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logging::Level::Error, &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Logger for Recorder {
        fn debug(&self, message: &str) {
            self.0.lock().push(format!("{} {}", Level::Debug, message));
        }
        fn info(&self, message: &str) {
            self.0.lock().push(format!("{} {}", Level::Info, message));
        }
        fn warn(&self, message: &str) {
            self.0.lock().push(format!("{} {}", Level::Warn, message));
        }
        fn error(&self, message: &str) {
            self.0.lock().push(format!("{} {}", Level::Error, message));
        }
    }

    #[test]
    fn test_macros_route_by_level() {
        let recorder = Recorder::default();
        crate::log_info!(recorder, "translated {}", "get_pods");
        crate::log_error!(recorder, "exit code {}", 1);
        assert_eq!(
            *recorder.0.lock(),
            vec!["INFO translated get_pods".to_string(), "ERROR exit code 1".to_string()]
        );
    }
}
