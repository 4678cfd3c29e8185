use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::time::{Instant, sleep};
use url::Url;

use crate::{
    api::{TaskInfo, TaskStatus, VideoApi},
    config::Config,
    errors::BotResult,
};

/// Where task status comes from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn task_status(&self, task_id: &str) -> BotResult<TaskInfo>;
}

#[async_trait]
impl StatusSource for VideoApi {
    async fn task_status(&self, task_id: &str) -> BotResult<TaskInfo> {
        VideoApi::task_status(self, task_id).await
    }
}

/// Where progress is shown; one screen replaces the previous one.
#[async_trait]
pub trait ProgressView: Send + Sync {
    async fn show(&self, screen: &ProgressScreen) -> BotResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressScreen {
    Starting,
    Running { progress: f64, status: TaskStatus },
    Completed { download_url: Option<Url> },
    Failed { details: String },
    TimedOut,
    TrackingFailed { details: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed { download_url: Option<Url> },
    Failed,
    TimedOut,
    TrackingFailed,
}

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Pause between successful polls.
    pub interval: Duration,
    /// Consecutive failed polls tolerated before giving up.
    pub max_retries: u32,
    /// The n-th consecutive failure waits `backoff_step * n`.
    pub backoff_step: Duration,
    /// Overall budget for a task that is still running.
    pub timeout: Duration,
}

impl PollSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval,
            max_retries: config.poll_max_retries,
            backoff_step: config.poll_interval,
            timeout: config.poll_timeout,
        }
    }
}

async fn show<V: ProgressView + ?Sized>(view: &V, screen: &ProgressScreen) {
    if let Err(e) = view.show(screen).await {
        warn!("Failed to update progress message: {}", e);
    }
}

/// Delay after the `failures`-th consecutive error, saturating instead of overflowing.
fn backoff_delay(step: Duration, failures: u32) -> Duration {
    step.saturating_mul(failures)
}

/// Polls `task_id` until it completes, fails, times out or polling itself
/// keeps failing, keeping `view` up to date.
pub async fn track_progress<S, V>(
    source: &S,
    view: &V,
    task_id: &str,
    settings: &PollSettings,
) -> PollOutcome
where
    S: StatusSource + ?Sized,
    V: ProgressView + ?Sized,
{
    let started = Instant::now();
    let mut failures: u32 = 0;

    show(view, &ProgressScreen::Starting).await;

    loop {
        debug!("Checking progress for task {}", task_id);
        match source.task_status(task_id).await {
            Ok(task) => {
                failures = 0;
                // Every successful poll is shown, the final one included.
                show(
                    view,
                    &ProgressScreen::Running {
                        progress: task.progress,
                        status: task.status.clone(),
                    },
                )
                .await;

                match task.status {
                    TaskStatus::Completed => {
                        let download_url = task
                            .download_url
                            .as_deref()
                            .and_then(|raw| match Url::parse(raw) {
                                Ok(url) => Some(url),
                                Err(e) => {
                                    warn!("Task {} returned bad download url {}: {}", task_id, raw, e);
                                    None
                                }
                            });
                        info!("Task {} completed", task_id);
                        show(
                            view,
                            &ProgressScreen::Completed {
                                download_url: download_url.clone(),
                            },
                        )
                        .await;
                        return PollOutcome::Completed { download_url };
                    }
                    TaskStatus::Error => {
                        let details = task
                            .error
                            .unwrap_or_else(|| "Неизвестная ошибка".to_string());
                        info!("Task {} failed: {}", task_id, details);
                        show(view, &ProgressScreen::Failed { details }).await;
                        return PollOutcome::Failed;
                    }
                    _ => {
                        if started.elapsed() >= settings.timeout {
                            warn!("Task {} timed out after {:?}", task_id, settings.timeout);
                            show(view, &ProgressScreen::TimedOut).await;
                            return PollOutcome::TimedOut;
                        }
                        sleep(settings.interval).await;
                    }
                }
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                warn!(
                    "Error checking progress of task {} ({}/{}): {}",
                    task_id, failures, settings.max_retries, e
                );

                if failures >= settings.max_retries {
                    show(
                        view,
                        &ProgressScreen::TrackingFailed {
                            details: e.to_string(),
                        },
                    )
                    .await;
                    return PollOutcome::TrackingFailed;
                }
                sleep(backoff_delay(settings.backoff_step, failures)).await;
            }
        }
    }
}
