//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::adapters::progress::SnapshotStore;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub active_campaigns: usize,
    pub subscribers: usize,
}

/// GET /health
pub async fn health(State(store): State<Arc<SnapshotStore>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        active_campaigns: store.len(),
        subscribers: store.subscriber_count(),
    })
}

pub fn health_routes() -> Router<Arc<SnapshotStore>> {
    Router::new().route("/health", get(health))
}
