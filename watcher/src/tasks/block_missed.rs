//! Missed-block streak over a trailing window of blocks

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::{Alert, Check, Pluggable, Task, TaskContext};
use crate::chain::{ChainClient, ChainRole};
use crate::constants::intervals;
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

pub struct BlockMissed {
    block_window: u64,
    threshold: u64,
    prev_missed: Option<u64>,
}

impl BlockMissed {
    pub fn new(block_window: u64, threshold: u64) -> Self {
        Self {
            block_window,
            threshold,
            prev_missed: None,
        }
    }

    /// Height of the most recent missed block already reported
    pub fn prev_missed(&self) -> Option<u64> {
        self.prev_missed
    }
}

#[async_trait]
impl Check for BlockMissed {
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        _now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        let height = chain.get_height().await?;
        let address = chain.get_validator_address().await?;

        let start = height.saturating_sub(self.block_window).max(1);
        let mut missed = 0u64;
        let mut last_missed = None;
        for block in start..height {
            let signatures = chain.get_signatures(block).await?;
            if !signatures.iter().any(|s| s.validator_address == address) {
                missed += 1;
                last_missed = Some(block);
            }
        }

        let staking = chain.is_staking().await?;
        debug!(
            "{} missed block(s) in {}..{} (staking: {})",
            missed, start, height, staking
        );

        if staking && missed >= self.threshold && last_missed != self.prev_missed {
            self.prev_missed = last_missed;
            return Ok(Some(Alert::new(
                format!(
                    "{} not signed blocks in the latest {}",
                    missed, self.block_window
                ),
                Emoji::BlockMiss,
            )));
        }

        Ok(None)
    }
}

#[async_trait]
impl Pluggable for BlockMissed {
    const NAME: &'static str = "BlockMissed";

    fn is_pluggable(role: ChainRole) -> bool {
        role == ChainRole::Validator
    }

    async fn build(ctx: &TaskContext) -> Result<Task, ConfigError> {
        let chain = &ctx.config.chain;
        if chain.block_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain.block_window".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::BLOCK_MISSED_CHECK),
            Duration::seconds(intervals::BLOCK_MISSED_NOTIFY),
            Box::new(Self::new(chain.block_window, chain.threshold_notsigned)),
        ))
    }
}
