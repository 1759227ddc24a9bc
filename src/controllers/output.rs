use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    infrastructure::repositories::{audio_content_type, DirectoryStats, OutputDirectory},
};

#[derive(Debug, Serialize)]
pub struct StatsData {
    #[serde(flatten)]
    pub stats: DirectoryStats,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub status: &'static str,
    pub data: StatsData,
}

pub struct OutputController {
    output: Arc<OutputDirectory>,
}

impl OutputController {
    pub fn new(output: Arc<OutputDirectory>) -> Self {
        Self { output }
    }

    /// GET /api/output/{filename} - Serve a generated file
    pub async fn get_output(
        State(controller): State<Arc<OutputController>>,
        Path(filename): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let path = controller.output.resolve_output(&filename).await?;
        let bytes = tokio::fs::read(&path).await?;

        tracing::info!(file = %path.display(), size = bytes.len(), "Serving file");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(audio_content_type(&path)),
        );
        if let Ok(disposition) =
            HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        {
            headers.insert(header::CONTENT_DISPOSITION, disposition);
        }

        Ok((StatusCode::OK, headers, Body::from(bytes)))
    }

    /// GET /api/stats - Processing statistics
    pub async fn get_stats(
        State(controller): State<Arc<OutputController>>,
    ) -> AppResult<Json<StatsResponse>> {
        let stats = controller.output.stats().await?;
        Ok(Json(StatsResponse {
            status: "ok",
            data: StatsData {
                stats,
                timestamp: Utc::now().to_rfc3339(),
            },
        }))
    }
}
