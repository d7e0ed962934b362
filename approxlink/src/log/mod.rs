//! Logging abstraction layer.
//!
//! Exchange components never log through a process-wide logger. Each one
//! receives an `Arc<dyn Logger>` from the [`ExchangeContext`](crate::context::ExchangeContext)
//! it was built from, so a host decides per service where protocol messages go.
//!
//! - `Logger` trait: the interface every component logs through
//! - `TracingLogger`: production adapter that delegates to the `tracing` crate
//! - `NoOpLogger`: silent logger for benchmarks and quiet hosts
//! - `MemoryLogger`: keeps records in memory so tests can assert on them
//!
//! ```
//! use approxlink::log::{Logger, NoOpLogger};
//! use approxlink::{log_debug, log_info};
//! use std::sync::Arc;
//!
//! struct Poller {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Poller {
//!     fn tick(&self) {
//!         log_debug!(self.logger, "checking input-ready flag");
//!         log_info!(self.logger, "request served");
//!     }
//! }
//!
//! Poller { logger: Arc::new(NoOpLogger) }.tick();
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogRecord, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
