//! HTTP adapters - REST API implementations.
//!
//! Each module has its own HTTP adapter for endpoint exposure. The stream
//! endpoint lives in `adapters::sse`.

pub mod campaign;
mod error;
pub mod health;

pub use campaign::{campaign_routes, CampaignAppState};
pub use error::{ApiError, ErrorResponse};
pub use health::health_routes;

use std::sync::Arc;

use axum::Router;

use crate::adapters::progress::SnapshotStore;
use crate::adapters::sse::{stream_routes, SseState};

/// REST routes nested under `/api/campaigns`, plus `/health`.
pub fn rest_router(store: Arc<SnapshotStore>) -> Router {
    Router::new()
        .nest(
            "/api/campaigns",
            campaign_routes().with_state(CampaignAppState::new(store.clone())),
        )
        .merge(health_routes().with_state(store))
}

/// Stream routes nested under `/api/campaigns`.
pub fn stream_router(state: SseState) -> Router {
    Router::new().nest("/api/campaigns", stream_routes().with_state(state))
}
