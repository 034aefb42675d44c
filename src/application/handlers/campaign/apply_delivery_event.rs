//! ApplyDeliveryEventHandler - Command handler for delivery outcomes reported
//! by the send executor.

use crate::adapters::progress::CampaignAggregator;
use crate::domain::campaign::{CampaignSeed, CampaignSnapshot, DeliveryOutcome, ProgressError};
use crate::domain::foundation::{AccountId, CampaignId};

/// Command to apply one delivery outcome.
#[derive(Debug, Clone)]
pub struct ApplyDeliveryEventCommand {
    pub campaign_id: CampaignId,
    pub account_id: AccountId,
    pub outcome: DeliveryOutcome,
    /// Seeds the campaign the first time it is seen; ignored afterwards.
    pub total_hint: Option<CampaignSeed>,
}

/// Handler for delivery events.
pub struct ApplyDeliveryEventHandler {
    aggregator: CampaignAggregator,
}

impl ApplyDeliveryEventHandler {
    pub fn new(aggregator: CampaignAggregator) -> Self {
        Self { aggregator }
    }

    pub async fn handle(
        &self,
        cmd: ApplyDeliveryEventCommand,
    ) -> Result<CampaignSnapshot, ProgressError> {
        self.aggregator.apply_event(
            &cmd.campaign_id,
            &cmd.account_id,
            cmd.outcome,
            cmd.total_hint.as_ref(),
        )
    }
}
