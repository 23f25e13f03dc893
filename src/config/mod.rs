//! Configuration management for the collector and the agent
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and environment variables.

pub mod args;
pub mod models;
pub mod validation;

pub use args::{AgentArgs, CollectorArgs};
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MetricsError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// Load a YAML configuration file
pub async fn load_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MetricsError::config(format!("Failed to read config file: {}", e)))?;

    let config = serde_yaml::from_str(&content)
        .map_err(|e| MetricsError::config(format!("Failed to parse config: {}", e)))?;

    debug!("Configuration file parsed");
    Ok(config)
}

/// Run [`Validate`] and lift the message into a configuration error
pub fn validated<T: Validate>(config: T) -> Result<T> {
    config.validate().map_err(MetricsError::config)?;
    Ok(config)
}
