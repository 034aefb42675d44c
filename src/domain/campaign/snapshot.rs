//! Immutable copy of a campaign aggregate.

use std::collections::BTreeMap;

use crate::domain::foundation::{AccountId, CampaignId, CampaignStatus, Timestamp};

use super::DeliveryCounts;

/// Point-in-time state of one campaign, handed to subscribers.
///
/// Snapshots are taken under the campaign lock, so they never reflect a
/// partially applied change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignSnapshot {
    pub campaign_id: CampaignId,
    pub status: CampaignStatus,
    pub total: u64,
    pub counts: DeliveryCounts,
    /// Pending recipients not yet assigned to a sending account.
    pub unallocated: u64,
    pub accounts: BTreeMap<AccountId, DeliveryCounts>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub sequence: u64,
}

impl CampaignSnapshot {
    pub fn sent(&self) -> u64 {
        self.counts.sent
    }

    pub fn failed(&self) -> u64 {
        self.counts.failed
    }

    pub fn pending(&self) -> u64 {
        self.counts.pending
    }

    /// Share of recipients with a final outcome, 0-100.
    pub fn percent_complete(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let done = self.counts.sent + self.counts.failed;
        ((done * 100) / self.total) as u8
    }
}
