//! Checks and their scheduling/throttling wrapper
//!
//! A [`Task`] owns one [`Check`] together with two independent timers:
//! how often the check runs and how often it may surface a notification.
//! The check keeps its own history (previous height, rank, streak counter)
//! across runs and only reports transitions, so steady-state conditions do
//! not re-alert on every tick.
//!
//! Checks read everything they need from the chain before touching their
//! history. A failed or abandoned evaluation therefore leaves the history as
//! it was and the next tick retries cleanly.

pub mod block_missed;
pub mod bridge;
pub mod chain_stuck;
pub mod das_sampling;
pub mod low_peers;
pub mod node_synching;
pub mod position;
pub mod proposals;

pub use block_missed::BlockMissed;
pub use bridge::BridgeNotRunning;
pub use chain_stuck::ChainStuck;
pub use das_sampling::DasSamplingHeight;
pub use low_peers::LowPeers;
pub use node_synching::NodeIsSynching;
pub use position::PositionChanged;
pub use proposals::NewProposal;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::chain::{ChainClient, ChainRole};
use crate::config::Config;
use crate::errors::{ChainError, ConfigError};
use crate::notification::{Emoji, NotificationEvent};

pub fn minutes(n: i64) -> Duration {
    Duration::minutes(n)
}

pub fn hours(n: i64) -> Duration {
    Duration::hours(n)
}

/// Notify-worthy condition found by a check, before throttling
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub message: String,
    pub emoji: Emoji,
    /// End of a degraded condition; delivered regardless of the throttle
    pub recovery: bool,
}

impl Alert {
    pub fn new(message: impl Into<String>, emoji: Emoji) -> Self {
        Self {
            message: message.into(),
            emoji,
            recovery: false,
        }
    }

    pub fn recovery(message: impl Into<String>, emoji: Emoji) -> Self {
        Self {
            recovery: true,
            ..Self::new(message, emoji)
        }
    }
}

/// Check-specific logic with its private history
#[async_trait]
pub trait Check: Send {
    /// Compare the current chain state with the stored history, update the
    /// history and return an alert on a notify-worthy transition.
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError>;
}

/// Inputs available to task constructors
#[derive(Clone)]
pub struct TaskContext {
    pub config: Arc<Config>,
    pub role: ChainRole,
}

impl TaskContext {
    pub fn new(config: Arc<Config>, role: ChainRole) -> Self {
        Self { config, role }
    }

    pub fn rpc_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.config.rpc_timeout_seconds)
    }
}

/// A check that knows which node roles it applies to and how to build itself
#[async_trait]
pub trait Pluggable: Check + Sized + 'static {
    const NAME: &'static str;

    /// Pure predicate on the detected node role
    fn is_pluggable(role: ChainRole) -> bool;

    /// Construct the task; configuration errors keep it out of the registry
    async fn build(ctx: &TaskContext) -> Result<Task, ConfigError>;
}

pub struct Task {
    name: String,
    check_interval: Duration,
    notify_interval: Duration,
    last_checked: Option<DateTime<Utc>>,
    last_notified: Option<DateTime<Utc>>,
    check: Box<dyn Check>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        check_interval: Duration,
        notify_interval: Duration,
        check: Box<dyn Check>,
    ) -> Self {
        Self {
            name: name.into(),
            check_interval,
            notify_interval,
            last_checked: None,
            last_notified: None,
            check,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    pub fn notify_interval(&self) -> Duration {
        self.notify_interval
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    pub fn last_notified(&self) -> Option<DateTime<Utc>> {
        self.last_notified
    }

    /// True when the check interval elapsed; marks the task as checked so a
    /// slow evaluation is not started twice.
    pub fn should_check_now(&mut self, now: DateTime<Utc>) -> bool {
        let due = match self.last_checked {
            None => true,
            Some(last) => now - last >= self.check_interval,
        };
        if due {
            self.last_checked = Some(now);
        }
        due
    }

    pub fn can_notify(&self, now: DateTime<Utc>) -> bool {
        match self.last_notified {
            None => true,
            Some(last) => now - last >= self.notify_interval,
        }
    }

    /// Run the check and apply the notification throttle.
    ///
    /// Recovery alerts are sent once even inside the throttle window and do
    /// not move `last_notified`.
    pub async fn evaluate(
        &mut self,
        chain: &dyn ChainClient,
        now: DateTime<Utc>,
    ) -> Result<Option<NotificationEvent>, ChainError> {
        let Some(alert) = self.check.run(chain, now).await? else {
            return Ok(None);
        };

        if !alert.recovery {
            if !self.can_notify(now) {
                debug!(
                    "{}: alert suppressed, last notification at {:?}",
                    self.name, self.last_notified
                );
                return Ok(None);
            }
            self.last_notified = Some(now);
        }

        Ok(Some(NotificationEvent {
            task: self.name.clone(),
            message: alert.message,
            emoji: alert.emoji,
            timestamp: now,
        }))
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("check_interval", &self.check_interval)
            .field("notify_interval", &self.notify_interval)
            .field("last_checked", &self.last_checked)
            .field("last_notified", &self.last_notified)
            .finish()
    }
}

/// Render a duration such as "2h 13m"
pub fn elapsed_to_string(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - since).max(Duration::zero());
    let days = elapsed.num_days();
    let hours = elapsed.num_hours() % 24;
    let minutes = elapsed.num_minutes() % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Streak of consecutive degraded evaluations.
///
/// `since` is (re)set whenever the counter is zero, so while degraded it
/// holds the timestamp of the first degraded tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DegradedStreak {
    since: Option<DateTime<Utc>>,
    count: u32,
}

impl DegradedStreak {
    pub fn has_baseline(&self) -> bool {
        self.since.is_some()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.since = Some(now);
        self.count = 0;
    }

    /// Record a degraded tick and return how long the streak has lasted
    pub fn degraded(&mut self, now: DateTime<Utc>) -> String {
        if self.count == 0 {
            self.since = Some(now);
        }
        self.count += 1;
        elapsed_to_string(self.since.unwrap_or(now), now)
    }

    /// Record a healthy tick; returns the streak duration if one just ended
    pub fn recovered(&mut self, now: DateTime<Utc>) -> Option<String> {
        let elapsed = match (self.count, self.since) {
            (0, _) | (_, None) => None,
            (_, Some(since)) => Some(elapsed_to_string(since, now)),
        };
        self.reset(now);
        elapsed
    }
}
