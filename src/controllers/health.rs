use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use crate::infrastructure::repositories::AudioEngine;

pub const SERVICE_NAME: &str = "songtape audio production API";

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "timestamp": Utc::now().to_rfc3339()
        })),
    )
}

pub async fn health_ready(State(engine): State<Arc<dyn AudioEngine>>) -> impl IntoResponse {
    if engine.is_available().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "audio_engine": "available"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "audio_engine": "unavailable"
            })),
        )
    }
}
