//! Validator rank within the active set

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tracing::debug;

use super::{Alert, Check, Pluggable, Task, TaskContext};
use crate::chain::{json_u64, ChainClient, ChainRole, ValidatorEntry};
use crate::constants::{intervals, limits, NOT_IN_ACTIVE_SET};
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

pub struct PositionChanged {
    active_set: Option<u64>,
    prev: Option<i64>,
}

impl PositionChanged {
    pub fn new(active_set: Option<u64>) -> Self {
        Self {
            active_set,
            prev: None,
        }
    }

    pub fn prev(&self) -> Option<i64> {
        self.prev
    }
}

async fn validators_page(
    chain: &dyn ChainClient,
    height: &str,
    page: u64,
    per_page: u64,
) -> Result<Vec<ValidatorEntry>, ChainError> {
    let result = chain
        .rpc_call(
            "validators",
            vec![json!(height), json!(page.to_string()), json!(per_page.to_string())],
        )
        .await?;

    let validators = result
        .get("validators")
        .cloned()
        .unwrap_or(Value::Array(Vec::new()));

    serde_json::from_value(validators).map_err(|e| ChainError::MissingField {
        method: "validators".to_string(),
        field: format!("validators ({})", e),
    })
}

/// 1-based rank of this validator in the active set, `-1` when absent.
///
/// The set is fetched in pages of 100 up to the active set size (taken from
/// the override or from the `total` reported by the node).
pub async fn validator_position(
    chain: &dyn ChainClient,
    active_set: Option<u64>,
) -> Result<i64, ChainError> {
    let height = chain.get_height().await?.to_string();
    let address = chain.get_validator_address().await?;

    let active_set = match active_set {
        Some(size) => size,
        None => {
            let first_page = chain
                .rpc_call("validators", vec![json!(height), json!("1"), json!("1")])
                .await?;
            json_u64(&first_page, "validators", "/total")?
        }
    };

    if active_set == 0 {
        return Ok(NOT_IN_ACTIVE_SET);
    }

    let per_page = limits::VALIDATORS_PAGE_SIZE;
    let mut validators = Vec::new();
    if active_set > per_page {
        for page in 1..=active_set.div_ceil(per_page) {
            validators.extend(validators_page(chain, &height, page, per_page).await?);
        }
    } else {
        validators.extend(validators_page(chain, &height, 1, active_set).await?);
    }
    validators.truncate(active_set as usize);

    debug!("Scanned {} validators of an active set of {}", validators.len(), active_set);

    Ok(validators
        .iter()
        .position(|v| v.address == address)
        .map(|i| i as i64 + 1)
        .unwrap_or(NOT_IN_ACTIVE_SET))
}

#[async_trait]
impl Check for PositionChanged {
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        _now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        let position = validator_position(chain, self.active_set).await?;
        let staking = chain.is_staking().await?;

        let prev = *self.prev.get_or_insert(position);

        if !staking {
            return Ok(Some(Alert::new("out from the active set", Emoji::NoLeader)));
        }

        if position == prev {
            return Ok(None);
        }
        self.prev = Some(position);

        // numerically larger rank is reported as a decrease
        let alert = if position > prev {
            Alert::new(
                format!("position decreased from {} to {}", prev, position),
                Emoji::PosDown,
            )
        } else {
            Alert::new(
                format!("position increased from {} to {}", prev, position),
                Emoji::PosUp,
            )
        };
        Ok(Some(alert))
    }
}

#[async_trait]
impl Pluggable for PositionChanged {
    const NAME: &'static str = "PositionChanged";

    fn is_pluggable(role: ChainRole) -> bool {
        role == ChainRole::Validator
    }

    async fn build(ctx: &TaskContext) -> Result<Task, ConfigError> {
        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::POSITION_CHECK),
            Duration::seconds(intervals::POSITION_NOTIFY),
            Box::new(Self::new(ctx.config.chain.active_set)),
        ))
    }
}
