use crate::error::AppError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("plan file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read plan: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed plan: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid plan: {0}")]
    Invalid(String),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NotFound(_) => AppError::NotFound("Config file not found".to_string()),
            PlanError::Io(e) => AppError::Io(e),
            PlanError::Malformed(_) | PlanError::Invalid(_) => AppError::Internal(err.to_string()),
        }
    }
}
