//! GetCampaignProgressHandler - Query handler for a campaign's current snapshot.

use std::sync::Arc;

use crate::adapters::progress::SnapshotStore;
use crate::domain::campaign::{CampaignSnapshot, ProgressError};
use crate::domain::foundation::CampaignId;

/// Query for one campaign's progress.
#[derive(Debug, Clone)]
pub struct GetCampaignProgressQuery {
    pub campaign_id: CampaignId,
}

/// Handler for single-campaign progress reads.
pub struct GetCampaignProgressHandler {
    store: Arc<SnapshotStore>,
}

impl GetCampaignProgressHandler {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetCampaignProgressQuery,
    ) -> Result<CampaignSnapshot, ProgressError> {
        self.store.get(&query.campaign_id)
    }
}
