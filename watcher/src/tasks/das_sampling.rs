//! Data availability sampling keeps up with the network head

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{Alert, Check, DegradedStreak, Pluggable, Task, TaskContext};
use crate::chain::{ChainClient, ChainRole};
use crate::constants::intervals;
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

#[derive(Default)]
pub struct DasSamplingHeight {
    streak: DegradedStreak,
}

impl DasSamplingHeight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streak(&self) -> &DegradedStreak {
        &self.streak
    }
}

#[async_trait]
impl Check for DasSamplingHeight {
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        // initial catch-up is reported by the synching check
        if chain.is_synching().await? {
            return Ok(None);
        }

        let network_height = chain.get_network_height().await?;
        let sampled_height = chain.get_samples_height().await?;

        if !self.streak.has_baseline() {
            self.streak.reset(now);
            return Ok(None);
        }

        if network_height > sampled_height {
            let elapsed = self.streak.degraded(now);
            return Ok(Some(Alert::new(
                format!(
                    "is not sampling new headers, last block sampled is {}, current block header is {} ({})",
                    sampled_height, network_height, elapsed
                ),
                Emoji::Stuck,
            )));
        }

        Ok(self.streak.recovered(now).map(|elapsed| {
            Alert::recovery(
                format!("is back sampling new headers (after {})", elapsed),
                Emoji::SyncOk,
            )
        }))
    }
}

#[async_trait]
impl Pluggable for DasSamplingHeight {
    const NAME: &'static str = "DasSamplingHeight";

    fn is_pluggable(role: ChainRole) -> bool {
        matches!(role, ChainRole::Light | ChainRole::Full)
    }

    async fn build(_ctx: &TaskContext) -> Result<Task, ConfigError> {
        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::DAS_SAMPLING_CHECK),
            Duration::seconds(intervals::DAS_SAMPLING_NOTIFY),
            Box::new(Self::new()),
        ))
    }
}
