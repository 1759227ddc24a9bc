use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request for POST /api/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One line of the status journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(flatten)]
    pub update: StatusUpdate,
    pub recorded_at: DateTime<Utc>,
}

/// Request for POST /api/error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    pub timestamp: String,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// One line of the error journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(flatten)]
    pub report: ErrorReport,
    pub recorded_at: DateTime<Utc>,
}

impl StatusUpdate {
    pub fn now(status: &str, message: Option<String>, output_file: Option<String>) -> Self {
        Self {
            status: status.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            output_file,
            message,
        }
    }
}
