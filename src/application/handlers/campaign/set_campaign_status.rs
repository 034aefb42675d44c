//! SetCampaignStatusHandler - Command handler for executor status updates.
//!
//! Status is advisory here: no transition rules are enforced, the value only
//! drives timestamps and eviction eligibility.

use crate::adapters::progress::CampaignAggregator;
use crate::domain::campaign::{CampaignSnapshot, ProgressError};
use crate::domain::foundation::{CampaignId, CampaignStatus};

/// Command to overwrite a campaign's status.
#[derive(Debug, Clone)]
pub struct SetCampaignStatusCommand {
    pub campaign_id: CampaignId,
    pub status: CampaignStatus,
}

/// Handler for status updates.
pub struct SetCampaignStatusHandler {
    aggregator: CampaignAggregator,
}

impl SetCampaignStatusHandler {
    pub fn new(aggregator: CampaignAggregator) -> Self {
        Self { aggregator }
    }

    pub async fn handle(
        &self,
        cmd: SetCampaignStatusCommand,
    ) -> Result<CampaignSnapshot, ProgressError> {
        self.aggregator.set_status(&cmd.campaign_id, cmd.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::progress::SnapshotStore;

    fn campaign() -> CampaignId {
        CampaignId::new("spring-launch").unwrap()
    }

    fn command(status: CampaignStatus) -> SetCampaignStatusCommand {
        SetCampaignStatusCommand {
            campaign_id: campaign(),
            status,
        }
    }

    #[tokio::test]
    async fn any_transition_is_accepted() {
        let store = Arc::new(SnapshotStore::default());
        store.get_or_create(&campaign(), 1);
        let handler = SetCampaignStatusHandler::new(CampaignAggregator::new(store));

        handler.handle(command(CampaignStatus::Completed)).await.unwrap();
        let snapshot = handler.handle(command(CampaignStatus::Draft)).await.unwrap();

        assert_eq!(snapshot.status, CampaignStatus::Draft);
        assert!(snapshot.completed_at.is_some());
    }

    #[tokio::test]
    async fn unknown_campaign_is_not_found() {
        let handler =
            SetCampaignStatusHandler::new(CampaignAggregator::new(Arc::new(SnapshotStore::default())));
        let result = handler.handle(command(CampaignStatus::Sending)).await;
        assert!(matches!(result, Err(ProgressError::NotFound(_))));
    }
}
