//! Live progress stream endpoint.
//!
//! One task per connection: subscribe, emit the initial snapshot, then emit
//! each queued snapshot as it arrives. When the client goes away axum drops
//! the stream, which drops the subscription handle and unsubscribes. On
//! server shutdown every open stream is ended so connections can drain.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;

use crate::adapters::http::ApiError;
use crate::adapters::progress::{SubscriptionBroker, SubscriptionHandle};
use crate::domain::campaign::{CampaignSnapshot, ProgressError};
use crate::domain::foundation::CampaignId;

use super::frames::{progress_event, KEEP_ALIVE_TEXT};

/// Default idle interval before a keep-alive comment is sent.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(15);

/// State for the stream routes.
#[derive(Clone)]
pub struct SseState {
    pub broker: SubscriptionBroker,
    pub heartbeat: Duration,
    shutdown: Option<watch::Receiver<bool>>,
}

impl SseState {
    pub fn new(broker: SubscriptionBroker) -> Self {
        Self {
            broker,
            heartbeat: DEFAULT_HEARTBEAT,
            shutdown: None,
        }
    }

    pub fn with_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    /// End open streams once `shutdown` flips to `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }
}

/// Query parameters for the stream endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamQuery {
    /// Recipient total used when this connection creates the campaign.
    pub total: Option<u64>,
}

/// GET /api/campaigns/:campaign_id/stream - Subscribe to live progress
pub async fn stream_progress(
    State(state): State<SseState>,
    Path(campaign_id): Path<String>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>, ApiError> {
    let campaign_id = CampaignId::new(campaign_id)?;
    let (initial, handle) = state.broker.subscribe(&campaign_id, query.total)?;

    tracing::info!(
        campaign_id = %campaign_id,
        connection_id = %handle.connection_id(),
        sequence = initial.sequence,
        "Progress stream opened"
    );

    let keep_alive = KeepAlive::new()
        .interval(state.heartbeat)
        .text(KEEP_ALIVE_TEXT);
    let events = snapshot_stream(initial, handle).take_until(shutdown_requested(state.shutdown));
    Ok(Sse::new(events).keep_alive(keep_alive))
}

async fn shutdown_requested(shutdown: Option<watch::Receiver<bool>>) {
    if let Some(mut shutdown) = shutdown {
        if shutdown.wait_for(|stop| *stop).await.is_ok() {
            return;
        }
    }
    // No signal configured, or its sender is gone: never fire.
    std::future::pending::<()>().await
}

/// Initial snapshot followed by every queued update, until the campaign is
/// evicted or a frame cannot be encoded.
pub fn snapshot_stream(
    initial: CampaignSnapshot,
    handle: SubscriptionHandle,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    let first = encode(&initial, &handle);
    let updates = stream::unfold(handle, |mut handle| async move {
        let snapshot = handle.next_snapshot().await?;
        let event = encode(&snapshot, &handle)?;
        Some((Ok(event), handle))
    });

    stream::iter(first.map(Ok::<_, Infallible>)).chain(updates)
}

fn encode(snapshot: &CampaignSnapshot, handle: &SubscriptionHandle) -> Option<Event> {
    match progress_event(snapshot) {
        Ok(event) => Some(event),
        Err(e) => {
            let err = ProgressError::transport_write_failure(handle.connection_id(), e.to_string());
            tracing::warn!(
                campaign_id = %handle.campaign_id(),
                error = %err,
                "Closing progress stream"
            );
            None
        }
    }
}

/// Stream routes, to be nested under `/api/campaigns`.
///
/// # Routes
/// - `GET /:campaign_id/stream` - Server-sent progress frames
pub fn stream_routes() -> Router<SseState> {
    Router::new().route("/:campaign_id/stream", get(stream_progress))
}
