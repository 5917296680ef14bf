use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::chain::ChainClient;
use crate::config::Config;
use crate::notification::Notification;
use crate::tasks::Task;

pub struct Scheduler {
    chain: Arc<dyn ChainClient>,
    notification: Notification,
    tasks: Vec<Task>,
    tick_interval: Duration,
    evaluation_timeout: Duration,
}

impl Scheduler {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        notification: Notification,
        tasks: Vec<Task>,
        tick_interval: Duration,
        evaluation_timeout: Duration,
    ) -> Self {
        Self {
            chain,
            notification,
            tasks,
            tick_interval,
            evaluation_timeout,
        }
    }

    pub fn from_config(
        config: &Config,
        chain: Arc<dyn ChainClient>,
        notification: Notification,
        tasks: Vec<Task>,
    ) -> Self {
        Self::new(
            chain,
            notification,
            tasks,
            Duration::from_secs(config.tasks.tick_seconds),
            Duration::from_secs(config.tasks.evaluation_timeout_seconds),
        )
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Evaluate every due task once; returns how many notifications went out
    pub async fn run_once(&mut self, now: DateTime<Utc>) -> usize {
        let mut sent = 0;

        for task in self.tasks.iter_mut() {
            if !task.should_check_now(now) {
                continue;
            }
            debug!("Evaluating {}", task.name());

            let evaluation = task.evaluate(self.chain.as_ref(), now);
            let outcome = timeout(self.evaluation_timeout, evaluation).await;
            match outcome {
                Ok(Ok(Some(event))) => {
                    if self.notification.notify(&event).await {
                        sent += 1;
                    }
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => warn!("{} failed: {}", task.name(), e),
                Err(_) => warn!(
                    "{} timed out after {}s",
                    task.name(),
                    self.evaluation_timeout.as_secs()
                ),
            }
        }

        sent
    }

    /// Poll until the shutdown flag flips to true
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Scheduler started with {} tasks, {}s tick",
            self.tasks.len(),
            self.tick_interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_once(Utc::now()).await;

            tokio::select! {
                _ = tokio::time::sleep(self.tick_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }
}
