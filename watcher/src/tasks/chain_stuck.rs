//! Block hash not moving

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{elapsed_to_string, Alert, Check, Pluggable, Task, TaskContext};
use crate::chain::{ChainClient, ChainRole};
use crate::constants::{intervals, limits};
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

pub struct ChainStuck {
    stuck_after: Duration,
    prev_hash: Option<String>,
    since: Option<DateTime<Utc>>,
    stuck: bool,
}

impl ChainStuck {
    pub fn new(stuck_after: Duration) -> Self {
        Self {
            stuck_after,
            prev_hash: None,
            since: None,
            stuck: false,
        }
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck
    }
}

#[async_trait]
impl Check for ChainStuck {
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        let hash = chain.get_block_hash().await?;
        let since = self.since.unwrap_or(now);

        if self.prev_hash.as_deref() == Some(hash.as_str()) {
            if now - since < self.stuck_after {
                return Ok(None);
            }
            self.stuck = true;
            return Ok(Some(Alert::new(
                format!(
                    "chain is stuck at block hash {} since {}",
                    hash,
                    elapsed_to_string(since, now)
                ),
                Emoji::Stuck,
            )));
        }

        let alert = if self.stuck {
            Some(Alert::recovery(
                format!("chain is no longer stuck (after {})", elapsed_to_string(since, now)),
                Emoji::SyncOk,
            ))
        } else {
            None
        };

        self.prev_hash = Some(hash);
        self.since = Some(now);
        self.stuck = false;
        Ok(alert)
    }
}

#[async_trait]
impl Pluggable for ChainStuck {
    const NAME: &'static str = "ChainStuck";

    fn is_pluggable(_role: ChainRole) -> bool {
        true
    }

    async fn build(_ctx: &TaskContext) -> Result<Task, ConfigError> {
        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::CHAIN_STUCK_CHECK),
            Duration::seconds(intervals::CHAIN_STUCK_NOTIFY),
            Box::new(Self::new(Duration::minutes(limits::CHAIN_STUCK_MINUTES))),
        ))
    }
}
