//! Error handling for the metrics relay
//!
//! This module defines the error type shared by the agent and the collector,
//! the context wrapper used to prefix operation descriptions, and the HTTP
//! mapping used by the collector handlers.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use helpers::ResultExt;
pub use types::{MetricsError, Result};
