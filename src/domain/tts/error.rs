use crate::error::AppError;

/// Why a single synthesis attempt did not produce audio
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttemptFailure {
    #[error("endpoint returned status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("{0}")]
    Other(String),
}

impl AttemptFailure {
    /// Stable error-class label used in logs
    pub fn class(&self) -> &'static str {
        match self {
            AttemptFailure::Status(_) => "status",
            AttemptFailure::Timeout => "timeout",
            AttemptFailure::Connection(_) => "connection",
            AttemptFailure::Other(_) => "other",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("text must not be empty")]
    EmptyText,
    #[error("synthesis failed after {attempts} attempts across primary and fallback: {last}")]
    Exhausted { attempts: u32, last: AttemptFailure },
    #[error("synthesis cancelled")]
    Cancelled,
}

impl From<TtsError> for AppError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::EmptyText => AppError::BadRequest(err.to_string()),
            TtsError::Exhausted { .. } => AppError::ExternalService(err.to_string()),
            TtsError::Cancelled => AppError::Internal(err.to_string()),
        }
    }
}
