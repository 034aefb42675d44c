//! AllocateAccountHandler - Command handler for assigning recipients to a
//! sending account.

use crate::adapters::progress::CampaignAggregator;
use crate::domain::campaign::{CampaignSnapshot, ProgressError};
use crate::domain::foundation::{AccountId, CampaignId};

/// Command to move unallocated recipients onto an account.
#[derive(Debug, Clone)]
pub struct AllocateAccountCommand {
    pub campaign_id: CampaignId,
    pub account_id: AccountId,
    pub recipients: u64,
}

/// Handler for account allocation.
pub struct AllocateAccountHandler {
    aggregator: CampaignAggregator,
}

impl AllocateAccountHandler {
    pub fn new(aggregator: CampaignAggregator) -> Self {
        Self { aggregator }
    }

    pub async fn handle(
        &self,
        cmd: AllocateAccountCommand,
    ) -> Result<CampaignSnapshot, ProgressError> {
        self.aggregator
            .allocate(&cmd.campaign_id, &cmd.account_id, cmd.recipients)
    }
}
