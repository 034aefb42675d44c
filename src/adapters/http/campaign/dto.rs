//! HTTP DTOs (Data Transfer Objects) for campaign progress endpoints.
//!
//! Snapshot responses reuse the stream frame shape, so a REST read and an
//! SSE frame for the same sequence carry identical counters.

use serde::{Deserialize, Serialize};

use crate::adapters::sse::ProgressFrame;
use crate::domain::campaign::{CampaignSeed, CampaignSnapshot, DeliveryOutcome};
use crate::domain::foundation::CampaignStatus;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Delivery outcome reported by the send executor.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryEventRequest {
    pub account_id: String,
    pub outcome: DeliveryOutcome,
    /// Seeds the campaign if this is the first time it is seen.
    #[serde(default)]
    pub total_hint: Option<CampaignSeed>,
}

/// Recipients to assign to a sending account.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocateAccountRequest {
    pub account_id: String,
    pub recipients: u64,
}

/// New status for a campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub status: CampaignStatus,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Full progress state of one campaign.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignProgressResponse {
    #[serde(flatten)]
    pub frame: ProgressFrame,
    /// Pending recipients not yet assigned to an account.
    pub unallocated: u64,
    pub percent_complete: u8,
    pub sequence: u64,
}

impl From<&CampaignSnapshot> for CampaignProgressResponse {
    fn from(snapshot: &CampaignSnapshot) -> Self {
        Self {
            frame: ProgressFrame::from(snapshot),
            unallocated: snapshot.unallocated,
            percent_complete: snapshot.percent_complete(),
            sequence: snapshot.sequence,
        }
    }
}

impl From<CampaignSnapshot> for CampaignProgressResponse {
    fn from(snapshot: CampaignSnapshot) -> Self {
        Self::from(&snapshot)
    }
}

/// Overview of all active campaigns.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<CampaignProgressResponse>,
    pub total: usize,
    pub subscribers: usize,
}
