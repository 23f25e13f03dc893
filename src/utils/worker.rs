//! Interval-driven background task runner

use crate::utils::error::{MetricsError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs an async job every `interval` until its token is cancelled.
///
/// The first run happens one full interval after start. A failed run is
/// logged and the loop keeps going.
#[derive(Debug, Clone)]
pub struct PeriodicWorker {
    name: String,
    interval: Duration,
}

impl PeriodicWorker {
    pub fn new(name: impl Into<String>, interval: Duration) -> Result<Self> {
        let name = name.into();
        if interval.is_zero() {
            return Err(MetricsError::config(format!(
                "{} interval must be greater than zero",
                name
            )));
        }
        Ok(Self { name, interval })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn run<F, Fut>(&self, cancel: CancellationToken, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("{} worker stopped", self.name);
                    return;
                }
                _ = interval.tick() => {
                    if let Err(e) = job().await {
                        warn!("{} failed: {}", self.name, e);
                    }
                }
            }
        }
    }

    pub fn spawn<F, Fut>(self, cancel: CancellationToken, job: F) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        tokio::spawn(async move { self.run(cancel, job).await })
    }
}
