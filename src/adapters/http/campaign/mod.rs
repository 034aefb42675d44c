//! HTTP adapter for campaign progress endpoints.
//!
//! - `POST /api/campaigns/:campaign_id/events` - Apply a delivery outcome
//! - `POST /api/campaigns/:campaign_id/accounts` - Assign recipients to an account
//! - `PUT /api/campaigns/:campaign_id/status` - Record campaign status
//! - `DELETE /api/campaigns/:campaign_id` - Tear the campaign down
//! - `GET /api/campaigns/:campaign_id` - Current snapshot
//! - `GET /api/campaigns` - Overview of active campaigns

pub mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::{
    allocate_account, apply_delivery_event, get_campaign_progress, list_active_campaigns,
    set_campaign_status, teardown_campaign, CampaignAppState,
};
pub use routes::campaign_routes;
