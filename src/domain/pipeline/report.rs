use crate::domain::audio::AssemblyError;
use crate::error::AppError;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Stages of a production run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    PlanLoaded,
    GeneratingParts,
    MergingParts,
    Normalizing,
    Done,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::PlanLoaded => "plan_loaded",
            RunState::GeneratingParts => "generating_parts",
            RunState::MergingParts => "merging_parts",
            RunState::Normalizing => "normalizing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that end a run without a final artifact
#[derive(Debug, thiserror::Error)]
pub enum PipelineFailure {
    #[error("no parts generated successfully")]
    NoParts,
    #[error("final merge failed: {0}")]
    FinalMerge(#[source] AssemblyError),
    #[error("run cancelled")]
    Cancelled,
    #[error("could not prepare output directories: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PipelineFailure> for AppError {
    fn from(err: PipelineFailure) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartStatus {
    Merged,
    Skipped,
}

/// Outcome of one part
#[derive(Debug, Clone, Serialize)]
pub struct PartReport {
    pub part_id: String,
    pub name: String,
    pub status: PartStatus,
    pub segments_succeeded: usize,
    pub segments_total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Summary of a finished run
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub project: String,
    pub state: RunState,
    /// Final artifact; the normalized file when normalization succeeded
    pub final_output: Option<PathBuf>,
    pub normalized: bool,
    pub parts_succeeded: usize,
    pub parts_total: usize,
    pub duration_secs: Option<f64>,
    pub parts: Vec<PartReport>,
    pub error: Option<String>,
    #[serde(skip)]
    pub failure: Option<PipelineFailure>,
}

impl RunReport {
    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        match (&self.final_output, &self.error) {
            (Some(output), _) if self.is_done() => format!(
                "Production complete: {} ({}/{} parts)",
                output.display(),
                self.parts_succeeded,
                self.parts_total
            ),
            (_, Some(error)) => format!(
                "Production failed: {} ({}/{} parts)",
                error, self.parts_succeeded, self.parts_total
            ),
            _ => format!(
                "Production {} ({}/{} parts)",
                self.state, self.parts_succeeded, self.parts_total
            ),
        }
    }
}
