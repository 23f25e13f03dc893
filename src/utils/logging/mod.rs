//! Logging utilities
//!
//! - `types`: log level and output format parsed from configuration
//! - `utils`: subscriber initialisation

pub mod types;
pub mod utils;

pub use types::{LogFormat, LogLevel};
pub use utils::LoggingUtils;
