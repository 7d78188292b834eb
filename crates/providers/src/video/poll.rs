//! Fixed-interval status polling for video jobs.
//!
//! The first query is issued immediately; each later one waits
//! [`PollConfig::interval`]. After [`PollConfig::max_attempts`] queries
//! without a terminal status the poll gives up, without issuing an
//! extra query.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{GenerationTask, TaskStatus, VideoError, VideoProvider};
use crate::error::ProviderError;

/// Default wait between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Default number of status queries before giving up (~10 minutes).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollConfig {
    /// Longest a full poll can wait: `interval × max_attempts`.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Poll `task` until it reaches a terminal status.
///
/// `task.status` and `task.poll_attempt` track the latest query. Returns
/// the provider's file locator on `Finished`. Errors are
/// [`VideoError::GenerationFailed`] for `Fail`/unknown statuses,
/// [`VideoError::Timeout`] when the cap is hit, and
/// [`VideoError::Cancelled`] when `cancel` fires. Transport errors from
/// a query abort the poll.
pub async fn poll_until_terminal(
    provider: &dyn VideoProvider,
    task: &mut GenerationTask,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<String, VideoError> {
    loop {
        if cancel.is_cancelled() {
            return Err(VideoError::Cancelled);
        }

        let poll = provider.query(&task.task_id).await?;
        task.poll_attempt += 1;
        task.status = poll.status;
        let attempt = task.poll_attempt;
        let task_id = task.task_id.as_str();

        tracing::debug!(
            provider = provider.name(),
            task_id,
            attempt,
            status = %poll.status,
            raw_status = poll.raw_status.as_deref().unwrap_or(""),
            "Video task status",
        );

        match poll.status {
            TaskStatus::Finished => {
                return match poll.file_locator.filter(|l| !l.trim().is_empty()) {
                    Some(locator) => {
                        tracing::info!(
                            provider = provider.name(),
                            task_id,
                            attempt,
                            "Video task finished",
                        );
                        Ok(locator)
                    }
                    None => Err(ProviderError::MissingField("file_id").into()),
                };
            }
            TaskStatus::Fail | TaskStatus::Unknown => {
                tracing::warn!(
                    provider = provider.name(),
                    task_id,
                    status = %poll.status,
                    raw_status = poll.raw_status.as_deref().unwrap_or(""),
                    "Video task failed",
                );
                return Err(VideoError::GenerationFailed {
                    status: poll.status,
                    detail: poll.raw_status,
                });
            }
            _ => {}
        }

        if attempt >= config.max_attempts {
            tracing::warn!(
                provider = provider.name(),
                task_id,
                attempts = attempt,
                "Video task poll limit reached",
            );
            return Err(VideoError::Timeout { attempts: attempt });
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(VideoError::Cancelled),
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}
