//! Local height catching up with the network

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{Alert, Check, DegradedStreak, Pluggable, Task, TaskContext};
use crate::chain::{ChainClient, ChainRole};
use crate::constants::{intervals, limits};
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

#[derive(Default)]
pub struct NodeIsSynching {
    prev: Option<u64>,
    streak: DegradedStreak,
}

impl NodeIsSynching {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prev(&self) -> Option<u64> {
        self.prev
    }

    pub fn streak(&self) -> &DegradedStreak {
        &self.streak
    }
}

#[async_trait]
impl Check for NodeIsSynching {
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        let height = chain.get_height().await?;

        let Some(prev) = self.prev else {
            self.prev = Some(height);
            self.streak.reset(now);
            return Ok(None);
        };

        let network_height = chain.get_network_height().await?;

        // prev stays put while synching so progress keeps counting
        if height > prev && height.abs_diff(network_height) > limits::SYNC_HEIGHT_GAP {
            self.streak.degraded(now);
            return Ok(Some(Alert::new(
                format!(
                    "chain is synching, last block stored is {}, current network height is {}",
                    height, network_height
                ),
                Emoji::Slow,
            )));
        }

        self.prev = Some(height);
        Ok(self.streak.recovered(now).map(|elapsed| {
            Alert::recovery(format!("chain synched in {}", elapsed), Emoji::SyncOk)
        }))
    }
}

#[async_trait]
impl Pluggable for NodeIsSynching {
    const NAME: &'static str = "NodeIsSynching";

    fn is_pluggable(role: ChainRole) -> bool {
        role.is_das()
    }

    async fn build(_ctx: &TaskContext) -> Result<Task, ConfigError> {
        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::NODE_SYNCHING_CHECK),
            Duration::seconds(intervals::NODE_SYNCHING_NOTIFY),
            Box::new(Self::new()),
        ))
    }
}
