//! CampaignStatus enum reported by the send executor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a campaign.
///
/// The executor owns the real state machine; this service only records the
/// latest value and derives timestamps and eviction eligibility from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Preparing,
    Ready,
    Sending,
    Paused,
    Completed,
    Failed,
}

impl CampaignStatus {
    /// Returns true once the campaign can no longer produce delivery events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }

    /// Returns true while emails are being dispatched.
    pub fn is_sending(&self) -> bool {
        matches!(self, CampaignStatus::Sending)
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Preparing => "preparing",
            CampaignStatus::Ready => "ready",
            CampaignStatus::Sending => "sending",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
