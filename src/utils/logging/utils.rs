use super::types::{LogFormat, LogLevel};
use crate::utils::error::{MetricsError, Result};
use tracing_subscriber::EnvFilter;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured level when it is set.
    pub fn init_logger(log_level: Option<LogLevel>, format: LogFormat) -> Result<()> {
        let level = log_level.unwrap_or_default();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Self::default_directives(level)));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_line_number(true);

        let installed = match format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };

        installed.map_err(|e| MetricsError::config(format!("failed to init logger: {}", e)))
    }

    /// Filter directives for a level, keeping noisy dependencies one step quieter
    pub fn default_directives(level: LogLevel) -> String {
        let quiet = match level {
            LogLevel::Trace | LogLevel::Debug => "info",
            _ => "warn",
        };
        format!(
            "{level},sqlx={quiet},sea_orm={quiet},hyper={quiet},reqwest={quiet}",
            level = level.as_str()
        )
    }

    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_ms = duration.as_millis();
        if total_ms < 1000 {
            format!("{}ms", total_ms)
        } else {
            format!("{:.2}s", duration.as_secs_f64())
        }
    }
}
