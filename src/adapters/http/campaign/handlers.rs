//! HTTP handlers for campaign progress endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::ApiError;
use crate::adapters::progress::{CampaignAggregator, SnapshotStore};
use crate::application::handlers::campaign::{
    AllocateAccountCommand, AllocateAccountHandler, ApplyDeliveryEventCommand,
    ApplyDeliveryEventHandler, GetCampaignProgressHandler, GetCampaignProgressQuery,
    ListActiveCampaignsHandler, ListActiveCampaignsQuery, SetCampaignStatusCommand,
    SetCampaignStatusHandler, TeardownCampaignCommand, TeardownCampaignHandler,
};
use crate::domain::foundation::{AccountId, CampaignId};

use super::dto::{
    AllocateAccountRequest, CampaignListResponse, CampaignProgressResponse, DeliveryEventRequest,
    SetStatusRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the campaign REST endpoints.
#[derive(Clone)]
pub struct CampaignAppState {
    pub store: Arc<SnapshotStore>,
    pub aggregator: CampaignAggregator,
}

impl CampaignAppState {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            aggregator: CampaignAggregator::new(store.clone()),
            store,
        }
    }

    pub fn apply_delivery_event_handler(&self) -> ApplyDeliveryEventHandler {
        ApplyDeliveryEventHandler::new(self.aggregator.clone())
    }

    pub fn allocate_account_handler(&self) -> AllocateAccountHandler {
        AllocateAccountHandler::new(self.aggregator.clone())
    }

    pub fn set_campaign_status_handler(&self) -> SetCampaignStatusHandler {
        SetCampaignStatusHandler::new(self.aggregator.clone())
    }

    pub fn teardown_campaign_handler(&self) -> TeardownCampaignHandler {
        TeardownCampaignHandler::new(self.aggregator.clone())
    }

    pub fn get_campaign_progress_handler(&self) -> GetCampaignProgressHandler {
        GetCampaignProgressHandler::new(self.store.clone())
    }

    pub fn list_active_campaigns_handler(&self) -> ListActiveCampaignsHandler {
        ListActiveCampaignsHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/campaigns/:campaign_id/events - Apply a delivery outcome
pub async fn apply_delivery_event(
    State(state): State<CampaignAppState>,
    Path(campaign_id): Path<String>,
    Json(request): Json<DeliveryEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ApplyDeliveryEventCommand {
        campaign_id: CampaignId::new(campaign_id)?,
        account_id: AccountId::new(request.account_id)?,
        outcome: request.outcome,
        total_hint: request.total_hint,
    };

    let snapshot = state.apply_delivery_event_handler().handle(cmd).await?;
    Ok(Json(CampaignProgressResponse::from(snapshot)))
}

/// POST /api/campaigns/:campaign_id/accounts - Assign recipients to an account
pub async fn allocate_account(
    State(state): State<CampaignAppState>,
    Path(campaign_id): Path<String>,
    Json(request): Json<AllocateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AllocateAccountCommand {
        campaign_id: CampaignId::new(campaign_id)?,
        account_id: AccountId::new(request.account_id)?,
        recipients: request.recipients,
    };

    let snapshot = state.allocate_account_handler().handle(cmd).await?;
    Ok(Json(CampaignProgressResponse::from(snapshot)))
}

/// PUT /api/campaigns/:campaign_id/status - Record the executor's status
pub async fn set_campaign_status(
    State(state): State<CampaignAppState>,
    Path(campaign_id): Path<String>,
    Json(request): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SetCampaignStatusCommand {
        campaign_id: CampaignId::new(campaign_id)?,
        status: request.status,
    };

    let snapshot = state.set_campaign_status_handler().handle(cmd).await?;
    Ok(Json(CampaignProgressResponse::from(snapshot)))
}

/// DELETE /api/campaigns/:campaign_id - Tear a campaign down
pub async fn teardown_campaign(
    State(state): State<CampaignAppState>,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = TeardownCampaignCommand {
        campaign_id: CampaignId::new(campaign_id)?,
    };

    state.teardown_campaign_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/campaigns/:campaign_id - Current snapshot
pub async fn get_campaign_progress(
    State(state): State<CampaignAppState>,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetCampaignProgressQuery {
        campaign_id: CampaignId::new(campaign_id)?,
    };

    let snapshot = state.get_campaign_progress_handler().handle(query).await?;
    Ok(Json(CampaignProgressResponse::from(snapshot)))
}

/// GET /api/campaigns - Overview of active campaigns
pub async fn list_active_campaigns(State(state): State<CampaignAppState>) -> impl IntoResponse {
    let overview = state
        .list_active_campaigns_handler()
        .handle(ListActiveCampaignsQuery)
        .await;

    let campaigns: Vec<CampaignProgressResponse> = overview
        .campaigns
        .iter()
        .map(CampaignProgressResponse::from)
        .collect();
    Json(CampaignListResponse {
        total: campaigns.len(),
        campaigns,
        subscribers: overview.subscriber_count,
    })
}
