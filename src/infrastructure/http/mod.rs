use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use crate::controllers::{
    config::ConfigController, health, journal::JournalController, output::OutputController,
    production::ProductionController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::AudioEngine;

/// Build the application router with all routes configured
pub fn create_router(
    engine: Arc<dyn AudioEngine>,
    config_controller: Arc<ConfigController>,
    production_controller: Arc<ProductionController>,
    journal_controller: Arc<JournalController>,
    output_controller: Arc<OutputController>,
) -> Router {
    let config_routes = Router::new()
        .route("/api/config", get(ConfigController::get_config))
        .route("/api/config/parts", get(ConfigController::get_parts))
        .with_state(config_controller);

    let production_routes = Router::new()
        .route("/api/merge", post(ProductionController::merge))
        .route("/api/produce", post(ProductionController::produce))
        .with_state(production_controller);

    let journal_routes = Router::new()
        .route("/api/status", post(JournalController::record_status))
        .route("/api/error", post(JournalController::record_error))
        .route("/api/status/log", get(JournalController::status_log))
        .route("/api/error/log", get(JournalController::error_log))
        .with_state(journal_controller);

    let output_routes = Router::new()
        .route("/api/output/:filename", get(OutputController::get_output))
        .route("/api/stats", get(OutputController::get_stats))
        .with_state(output_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(engine)
        .merge(config_routes)
        .merge(production_routes)
        .merge(journal_routes)
        .merge(output_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` until `shutdown` is cancelled
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
