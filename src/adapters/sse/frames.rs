//! Wire format of the progress stream.
//!
//! Every frame is a full-state replacement, never a diff:
//!
//! ```text
//! event: progress
//! id: 42
//! data: {"campaign_id":"spring-launch","status":"sending","total":3,"sent":1,...}
//! ```

use std::collections::BTreeMap;

use axum::response::sse::Event;
use serde::Serialize;

use crate::domain::campaign::{CampaignSnapshot, DeliveryCounts};
use crate::domain::foundation::CampaignStatus;

/// SSE event name for progress frames.
pub const PROGRESS_EVENT: &str = "progress";

/// Comment text sent on idle connections.
pub const KEEP_ALIVE_TEXT: &str = "keep-alive";

/// JSON payload of one progress frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressFrame {
    pub campaign_id: String,
    pub status: CampaignStatus,
    pub total: u64,
    pub sent: u64,
    pub failed: u64,
    pub pending: u64,
    /// ISO 8601, null until the campaign starts sending.
    pub started_at: Option<String>,
    /// ISO 8601, null until the campaign reaches a terminal status.
    pub completed_at: Option<String>,
    pub accounts: BTreeMap<String, DeliveryCounts>,
}

impl From<&CampaignSnapshot> for ProgressFrame {
    fn from(snapshot: &CampaignSnapshot) -> Self {
        Self {
            campaign_id: snapshot.campaign_id.to_string(),
            status: snapshot.status,
            total: snapshot.total,
            sent: snapshot.sent(),
            failed: snapshot.failed(),
            pending: snapshot.pending(),
            started_at: snapshot.started_at.map(|t| t.to_rfc3339()),
            completed_at: snapshot.completed_at.map(|t| t.to_rfc3339()),
            accounts: snapshot
                .accounts
                .iter()
                .map(|(account, counts)| (account.to_string(), *counts))
                .collect(),
        }
    }
}

/// Encode a snapshot as an SSE `progress` event carrying its sequence as the id.
///
/// # Errors
///
/// Returns the serialization error if the frame cannot be encoded.
pub fn progress_event(snapshot: &CampaignSnapshot) -> Result<Event, axum::Error> {
    Event::default()
        .event(PROGRESS_EVENT)
        .id(snapshot.sequence.to_string())
        .json_data(ProgressFrame::from(snapshot))
}
