//! ListActiveCampaignsHandler - Query handler for the dashboard overview.

use std::sync::Arc;

use crate::adapters::progress::SnapshotStore;
use crate::domain::campaign::CampaignSnapshot;

/// Query for every campaign currently held in memory.
#[derive(Debug, Clone, Default)]
pub struct ListActiveCampaignsQuery;

/// Overview of active campaigns.
#[derive(Debug, Clone)]
pub struct ActiveCampaigns {
    pub campaigns: Vec<CampaignSnapshot>,
    pub subscriber_count: usize,
}

/// Handler for the overview listing.
///
/// The campaign set is copied first and each campaign is then read under its
/// own lock, so entries may be slightly out of step with each other.
pub struct ListActiveCampaignsHandler {
    store: Arc<SnapshotStore>,
}

impl ListActiveCampaignsHandler {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, _query: ListActiveCampaignsQuery) -> ActiveCampaigns {
        ActiveCampaigns {
            campaigns: self.store.snapshots(),
            subscriber_count: self.store.subscriber_count(),
        }
    }
}
