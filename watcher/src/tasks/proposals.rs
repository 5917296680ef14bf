//! New governance proposals in voting period

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{Alert, Check, Pluggable, Task, TaskContext};
use crate::chain::{ChainClient, ChainRole, Proposal};
use crate::constants::intervals;
use crate::errors::{ChainError, ConfigError};
use crate::notification::Emoji;

/// Reports the latest proposal once on startup, then every proposal whose
/// id is above the highest one seen so far.
pub struct NewProposal {
    gov_admin: Option<String>,
    seen_max: Option<u64>,
}

impl NewProposal {
    pub fn new(gov_admin: Option<String>) -> Self {
        Self {
            gov_admin,
            seen_max: None,
        }
    }

    pub fn seen_max(&self) -> Option<u64> {
        self.seen_max
    }
}

fn describe(proposal: &Proposal) -> String {
    format!("#{} {}", proposal.id(), proposal.title())
}

#[async_trait]
impl Check for NewProposal {
    async fn run(
        &mut self,
        chain: &dyn ChainClient,
        _now: DateTime<Utc>,
    ) -> Result<Option<Alert>, ChainError> {
        let proposals = chain.get_latest_proposals().await?;
        let newest = proposals.iter().max_by_key(|p| p.id());

        let Some(seen_max) = self.seen_max else {
            // nothing to baseline against until a proposal exists
            let Some(latest) = newest else {
                return Ok(None);
            };
            self.seen_max = Some(latest.id());
            return Ok(Some(Alert::new(
                format!("got latest proposal: {}", describe(latest)),
                Emoji::Proposal,
            )));
        };

        let unread: Vec<&Proposal> = proposals.iter().filter(|p| p.id() > seen_max).collect();
        if unread.is_empty() {
            return Ok(None);
        }
        self.seen_max = newest.map(Proposal::id);

        let titles: Vec<String> = unread.iter().map(|p| describe(p)).collect();
        let mut message = format!("got {} new proposal: {}", unread.len(), titles.join("\n"));
        if let Some(admin) = &self.gov_admin {
            message.push(' ');
            message.push_str(admin);
        }

        Ok(Some(Alert::new(message, Emoji::Proposal)))
    }
}

#[async_trait]
impl Pluggable for NewProposal {
    const NAME: &'static str = "NewProposal";

    fn is_pluggable(role: ChainRole) -> bool {
        role == ChainRole::Validator
    }

    async fn build(ctx: &TaskContext) -> Result<Task, ConfigError> {
        // proposals are queried through the node binary of this unit
        if ctx.config.chain.service.is_none() {
            return Err(ConfigError::MissingRequired {
                field: "chain.service".to_string(),
            });
        }

        Ok(Task::new(
            Self::NAME,
            Duration::seconds(intervals::PROPOSAL_CHECK),
            Duration::seconds(intervals::PROPOSAL_NOTIFY),
            Box::new(Self::new(ctx.config.tasks.gov_admin.clone())),
        ))
    }
}
