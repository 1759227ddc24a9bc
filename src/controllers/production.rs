use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{
        audio::{crossfade_from_secs, AudioArtifact},
        pipeline::RunReport,
        plan::ProductionPlan,
    },
    error::{AppError, AppResult},
    infrastructure::{
        http::RequestId,
        pipeline::PipelineFactory,
        repositories::{LogJournal, OutputDirectory},
    },
};

pub const DEFAULT_MERGE_OUTPUT: &str = "final.mp3";
pub const DEFAULT_MERGE_CROSSFADE_SECS: f64 = 0.5;

/// Body of POST /api/merge: either the bare list of files or an object
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MergeBody {
    Files(Vec<String>),
    Request(MergeRequest),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MergeRequest {
    pub files: Vec<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub crossfade: Option<f64>,
}

/// Query parameters of POST /api/merge; they win over body fields
#[derive(Debug, Default, Deserialize)]
pub struct MergeParams {
    pub output: Option<String>,
    pub crossfade: Option<f64>,
}

impl MergeBody {
    /// Files, output name and crossfade seconds after applying query overrides
    /// and defaults.
    fn resolve(self, params: MergeParams) -> (Vec<String>, String, f64) {
        let (files, output, crossfade) = match self {
            MergeBody::Files(files) => (files, None, None),
            MergeBody::Request(request) => (request.files, request.output, request.crossfade),
        };
        (
            files,
            params
                .output
                .or(output)
                .unwrap_or_else(|| DEFAULT_MERGE_OUTPUT.to_string()),
            params
                .crossfade
                .or(crossfade)
                .unwrap_or(DEFAULT_MERGE_CROSSFADE_SECS),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub status: &'static str,
    pub message: String,
    pub output: String,
    /// Output size in bytes
    pub size: u64,
    /// Planned output length in seconds
    pub duration: Option<f64>,
    pub timestamp: String,
}

pub struct ProductionController {
    factory: Arc<PipelineFactory>,
    output: Arc<OutputDirectory>,
    status_journal: Arc<LogJournal>,
    plan_path: PathBuf,
    shutdown: CancellationToken,
    run_lock: Mutex<()>,
}

impl ProductionController {
    pub fn new(
        factory: Arc<PipelineFactory>,
        output: Arc<OutputDirectory>,
        status_journal: Arc<LogJournal>,
        plan_path: PathBuf,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            factory,
            output,
            status_journal,
            plan_path,
            shutdown,
            run_lock: Mutex::new(()),
        }
    }

    /// POST /api/merge - Merge existing audio files
    pub async fn merge(
        State(controller): State<Arc<ProductionController>>,
        Query(params): Query<MergeParams>,
        Json(body): Json<MergeBody>,
    ) -> AppResult<Json<MergeResponse>> {
        let (files, output, crossfade) = body.resolve(params);
        if files.is_empty() {
            return Err(AppError::BadRequest("No files provided".to_string()));
        }

        let mut inputs = Vec::with_capacity(files.len());
        for name in &files {
            let path = controller.output.resolve_input(name).await?;
            inputs.push(AudioArtifact::new(path));
        }
        let output_path = controller.output.output_path(&output)?;

        // Export settings follow the plan when one is readable
        let plan = match ProductionPlan::load(&controller.plan_path).await {
            Ok(plan) => Some(plan),
            Err(e) => {
                tracing::debug!(error = %e, "No usable plan, merging with default export settings");
                None
            }
        };

        tracing::info!(
            files = inputs.len(),
            output = %output_path.display(),
            crossfade_secs = crossfade,
            "Merging audio files"
        );

        let assembler = controller.factory.merge_assembler(plan.as_ref());
        let merged = assembler
            .merge(&inputs, crossfade_from_secs(crossfade), &output_path)
            .await?;
        let size = tokio::fs::metadata(&merged.path).await?.len();

        Ok(Json(MergeResponse {
            status: "success",
            message: format!("Merged {} files", inputs.len()),
            output: merged.path.display().to_string(),
            size,
            duration: merged.duration.map(|d| d.as_secs_f64()),
            timestamp: Utc::now().to_rfc3339(),
        }))
    }

    /// POST /api/produce - Run the full production pipeline
    pub async fn produce(
        State(controller): State<Arc<ProductionController>>,
        Extension(request_id): Extension<RequestId>,
    ) -> AppResult<Json<RunReport>> {
        let Ok(_running) = controller.run_lock.try_lock() else {
            return Err(AppError::Conflict(
                "A production run is already in progress".to_string(),
            ));
        };

        let plan = ProductionPlan::load(&controller.plan_path).await?;
        let pipeline = controller.factory.pipeline(&plan)?;
        let ctx = controller
            .factory
            .run_context()
            .with_journal(controller.status_journal.clone())
            .with_cancellation(controller.shutdown.child_token());

        tracing::info!(
            request_id = %request_id.0,
            run_id = %ctx.run_id,
            project = %plan.project,
            "Production requested"
        );

        let report = pipeline.run(&plan, &ctx).await;
        if report.is_done() {
            Ok(Json(report))
        } else {
            Err(AppError::Internal(report.summary()))
        }
    }
}
