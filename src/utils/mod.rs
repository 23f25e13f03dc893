//! Utility modules shared by the agent and the collector
//!
//! - **error**: error type, context wrapping and HTTP mapping
//! - **logging**: tracing subscriber setup
//! - **worker**: interval-driven background jobs

pub mod error;
pub mod logging;
pub mod worker;

pub use error::{MetricsError, Result, ResultExt};
pub use logging::{LogFormat, LogLevel, LoggingUtils};
pub use worker::PeriodicWorker;
