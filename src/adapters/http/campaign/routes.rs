//! Axum router configuration for campaign progress endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    allocate_account, apply_delivery_event, get_campaign_progress, list_active_campaigns,
    set_campaign_status, teardown_campaign, CampaignAppState,
};

/// Create the campaign REST router, to be nested under `/api/campaigns`.
///
/// # Routes
///
/// ## Send executor
/// - `POST /:campaign_id/events` - Apply a delivery outcome
/// - `POST /:campaign_id/accounts` - Assign recipients to an account
/// - `PUT /:campaign_id/status` - Record campaign status
/// - `DELETE /:campaign_id` - Tear the campaign down
///
/// ## Dashboard
/// - `GET /` - Overview of active campaigns
/// - `GET /:campaign_id` - Current snapshot
pub fn campaign_routes() -> Router<CampaignAppState> {
    Router::new()
        .route("/", get(list_active_campaigns))
        .route(
            "/:campaign_id",
            get(get_campaign_progress).delete(teardown_campaign),
        )
        .route("/:campaign_id/events", post(apply_delivery_event))
        .route("/:campaign_id/accounts", post(allocate_account))
        .route("/:campaign_id/status", put(set_campaign_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::progress::SnapshotStore;

    fn app() -> (Arc<SnapshotStore>, Router) {
        let store = Arc::new(SnapshotStore::default());
        let router = Router::new()
            .nest("/api/campaigns", campaign_routes())
            .with_state(CampaignAppState::new(store.clone()));
        (store, router)
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn event(outcome: &str) -> serde_json::Value {
        serde_json::json!({
            "account_id": "A",
            "outcome": outcome,
            "total_hint": {"total": 3}
        })
    }

    #[tokio::test]
    async fn event_with_hint_creates_campaign() {
        let (_, app) = app();

        let response = app
            .oneshot(json_request(Method::POST, "/api/campaigns/c-1/events", event("sent")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["sent"], 1);
        assert_eq!(json["pending"], 2);
        assert_eq!(json["accounts"]["A"]["sent"], 1);
    }

    #[tokio::test]
    async fn overflowing_event_is_conflict() {
        let (_, app) = app();
        for outcome in ["sent", "failed", "sent"] {
            let response = app
                .clone()
                .oneshot(json_request(Method::POST, "/api/campaigns/c-1/events", event(outcome)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(json_request(Method::POST, "/api/campaigns/c-1/events", event("sent")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error_code"], "INVALID_TRANSITION");
        assert_eq!(json["details"]["account_id"], "A");
    }

    #[tokio::test]
    async fn event_for_unknown_campaign_without_hint_is_404() {
        let (store, app) = app();
        let body = serde_json::json!({"account_id": "A", "outcome": "sent"});

        let response = app
            .oneshot(json_request(Method::POST, "/api/campaigns/c-1/events", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error_code"], "CAMPAIGN_NOT_FOUND");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn blank_account_is_validation_failure() {
        let (_, app) = app();
        let body = serde_json::json!({"account_id": "  ", "outcome": "sent", "total_hint": {"total": 1}});

        let response = app
            .oneshot(json_request(Method::POST, "/api/campaigns/c-1/events", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn allocate_then_read_back() {
        let (store, app) = app();
        store.get_or_create(&crate::domain::foundation::CampaignId::new("c-1").unwrap(), 5);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/campaigns/c-1/accounts",
                serde_json::json!({"account_id": "B", "recipients": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/campaigns/c-1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["unallocated"], 3);
        assert_eq!(json["accounts"]["B"]["pending"], 2);
    }

    #[tokio::test]
    async fn set_status_and_teardown() {
        let (store, app) = app();
        store.get_or_create(&crate::domain::foundation::CampaignId::new("c-1").unwrap(), 0);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/api/campaigns/c-1/status",
                serde_json::json!({"status": "sending"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "sending");
        assert!(json["started_at"].is_string());

        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/campaigns/c-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::get("/api/campaigns/c-1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_reports_active_campaigns() {
        let (store, app) = app();
        store.get_or_create(&crate::domain::foundation::CampaignId::new("b").unwrap(), 1);
        store.get_or_create(&crate::domain::foundation::CampaignId::new("a").unwrap(), 1);

        let response = app
            .oneshot(Request::get("/api/campaigns").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["campaigns"][0]["campaign_id"], "a");
    }
}
