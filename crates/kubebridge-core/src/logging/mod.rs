//! Logging abstractions
//!
//! Components receive an injected `Arc<dyn Logger>` instead of writing to a
//! global sink. The server wires in [`TracingLogger`]; tests use
//! [`NoOpLogger`].

mod traits;
mod noop;
mod console;
mod tracing_logger;

pub use traits::{Level, Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use tracing_logger::TracingLogger;
