use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use http::header::CONTENT_TYPE;
use http::{HeaderName, Method};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campaign_pulse::adapters::http::{rest_router, stream_router};
use campaign_pulse::adapters::progress::{EvictionSweeper, SnapshotStore, SubscriptionBroker};
use campaign_pulse::adapters::sse::SseState;
use campaign_pulse::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() {
    // --- Configuration ---
    let config = AppConfig::load().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    // --- Tracing ---
    let json_logs = config.is_production();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        environment = ?config.server.environment,
        "Loaded configuration"
    );

    // --- Progress engine ---
    let store = Arc::new(SnapshotStore::new(config.progress.queue_capacity));
    let broker = SubscriptionBroker::new(store.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = EvictionSweeper::with_config(store.clone(), config.progress.eviction());
    let sweeper_rx = shutdown_rx.clone();
    let sweeper_handle = tokio::spawn(async move { sweeper.run(sweeper_rx).await });
    tracing::info!(
        queue_capacity = config.progress.queue_capacity,
        grace_secs = config.progress.eviction_grace_secs,
        "Progress engine started"
    );

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let rest =
        rest_router(store.clone()).layer(TimeoutLayer::new(config.server.request_timeout()));
    // Streams stay open indefinitely, so they get no request timeout.
    let streams = stream_router(
        SseState::new(broker)
            .with_heartbeat(config.progress.heartbeat())
            .with_shutdown(shutdown_rx),
    );

    let app = Router::new()
        .merge(rest)
        .merge(streams)
        // -- Middleware stack (applied bottom-up) --
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(&config.server));

    // --- Start server ---
    let addr = config.server.socket_addr().expect("Invalid bind address");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Ends open streams and stops the sweeper.
            let _ = shutdown_tx.send(true);
        })
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    tracing::info!(
        active_campaigns = store.len(),
        "Graceful shutdown complete"
    );
}

/// Wait for Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Build the CORS layer. With no configured origins any origin is allowed,
/// which suits local dashboards in development.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = config.cors_header_values();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
