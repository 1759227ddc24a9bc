use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{domain::plan::ProductionPlan, error::AppResult};

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub status: &'static str,
    pub data: Value,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartsResponse {
    pub status: &'static str,
    pub parts: Value,
    pub count: usize,
    pub total_duration: Value,
}

pub struct ConfigController {
    plan_path: PathBuf,
}

impl ConfigController {
    pub fn new(plan_path: PathBuf) -> Self {
        Self { plan_path }
    }

    /// GET /api/config - Production plan as stored
    pub async fn get_config(
        State(controller): State<Arc<ConfigController>>,
    ) -> AppResult<Json<ConfigResponse>> {
        let document = ProductionPlan::read_document(&controller.plan_path).await?;
        Ok(Json(ConfigResponse {
            status: "ok",
            data: document,
            timestamp: Utc::now().to_rfc3339(),
        }))
    }

    /// GET /api/config/parts - Parts of the production plan
    pub async fn get_parts(
        State(controller): State<Arc<ConfigController>>,
    ) -> AppResult<Json<PartsResponse>> {
        let document = ProductionPlan::read_document(&controller.plan_path).await?;

        let parts = document
            .get("parts")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let count = parts.as_array().map(Vec::len).unwrap_or(0);
        let total_duration = document
            .get("metadata")
            .and_then(|m| m.get("totalDuration"))
            .cloned()
            .unwrap_or(Value::Null);

        Ok(Json(PartsResponse {
            status: "ok",
            parts,
            count,
            total_duration,
        }))
    }
}
