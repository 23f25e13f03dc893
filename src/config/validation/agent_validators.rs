//! Agent configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::providers::RuntimeStat;
use tracing::debug;

impl Validate for AgentConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating agent configuration");

        if self.address.trim().is_empty() {
            return Err("Collector address cannot be empty".to_string());
        }

        if self.rate_limit == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }

        if self.push_timeout == 0 {
            return Err("Push timeout must be greater than 0".to_string());
        }

        if self.report_interval == 0 {
            return Err("Report interval must be greater than 0".to_string());
        }

        if self.poll_interval == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }

        if self.batch_size == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }

        for name in &self.runtime_metrics {
            name.parse::<RuntimeStat>()
                .map_err(|_| format!("Unknown runtime metric: {}", name))?;
        }

        Ok(())
    }
}
