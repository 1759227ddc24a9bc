use crate::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("no audio inputs to merge")]
    EmptyInput,
    #[error("missing audio inputs: {}", display_paths(.0))]
    MissingInput(Vec<PathBuf>),
    #[error("output already exists: {}", .0.display())]
    Collision(PathBuf),
    #[error("{0} not found; install ffmpeg to merge audio")]
    ToolMissing(String),
    #[error("{tool} exited with {status:?}: {stderr}")]
    ToolFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("{tool} did not finish within {after:?}")]
    Timeout { tool: String, after: Duration },
    #[error("could not read duration of {}: {reason}", .path.display())]
    Probe { path: PathBuf, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<AssemblyError> for AppError {
    fn from(err: AssemblyError) -> Self {
        match err {
            AssemblyError::EmptyInput | AssemblyError::MissingInput(_) => {
                AppError::BadRequest(err.to_string())
            }
            AssemblyError::Collision(_) => AppError::Conflict(err.to_string()),
            AssemblyError::ToolMissing(_)
            | AssemblyError::ToolFailed { .. }
            | AssemblyError::Timeout { .. }
            | AssemblyError::Probe { .. } => AppError::ExternalService(err.to_string()),
            AssemblyError::Io(e) => AppError::Io(e),
        }
    }
}
