use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    domain::shared::{ErrorRecord, ErrorReport, StatusRecord, StatusUpdate},
    error::{AppError, AppResult},
    infrastructure::repositories::LogJournal,
};

#[derive(Debug, Serialize)]
pub struct LoggedResponse<T> {
    pub status: &'static str,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub status: &'static str,
    pub entries: Vec<Value>,
    pub count: usize,
}

/// Query form of POST /api/error; a JSON body, if any, becomes the details
#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub error: String,
    pub timestamp: String,
    #[serde(default)]
    pub node: Option<String>,
}

/// Status and error journals written by the workflow engine and by runs
pub struct JournalController {
    status_journal: Arc<LogJournal>,
    error_journal: Arc<LogJournal>,
}

impl JournalController {
    pub fn new(status_journal: Arc<LogJournal>, error_journal: Arc<LogJournal>) -> Self {
        Self {
            status_journal,
            error_journal,
        }
    }

    /// POST /api/status - Record a processing status.
    ///
    /// Fields come from the query string, or from a JSON body when the query
    /// does not carry them.
    pub async fn record_status(
        State(controller): State<Arc<JournalController>>,
        query: Option<Query<StatusUpdate>>,
        body: Option<Json<StatusUpdate>>,
    ) -> AppResult<Json<LoggedResponse<StatusRecord>>> {
        let update = match (query, body) {
            (Some(Query(update)), _) | (None, Some(Json(update))) => update,
            (None, None) => {
                return Err(AppError::BadRequest(
                    "status and timestamp are required".to_string(),
                ))
            }
        };

        tracing::info!(
            status = %update.status,
            message = update.message.as_deref().unwrap_or_default(),
            output_file = update.output_file.as_deref().unwrap_or_default(),
            "Status update"
        );

        let record = StatusRecord {
            update,
            recorded_at: Utc::now(),
        };
        controller.status_journal.append(&record).await?;

        Ok(Json(LoggedResponse {
            status: "logged",
            data: record,
        }))
    }

    /// POST /api/error - Record a workflow error
    pub async fn record_error(
        State(controller): State<Arc<JournalController>>,
        query: Option<Query<ErrorQuery>>,
        body: Option<Json<Value>>,
    ) -> AppResult<Json<LoggedResponse<ErrorRecord>>> {
        let body = body.map(|Json(value)| value);
        let report = match (query, body) {
            (Some(Query(query)), details) => ErrorReport {
                error: query.error,
                timestamp: query.timestamp,
                node: query.node,
                details,
            },
            (None, Some(value)) => serde_json::from_value::<ErrorReport>(value)
                .map_err(|e| AppError::BadRequest(format!("Invalid error report: {}", e)))?,
            (None, None) => {
                return Err(AppError::BadRequest(
                    "error and timestamp are required".to_string(),
                ))
            }
        };

        tracing::error!(
            node = report.node.as_deref().unwrap_or("unknown"),
            error = %report.error,
            "Workflow error reported"
        );

        let record = ErrorRecord {
            report,
            recorded_at: Utc::now(),
        };
        controller.error_journal.append(&record).await?;

        Ok(Json(LoggedResponse {
            status: "logged",
            data: record,
        }))
    }

    /// GET /api/status/log
    pub async fn status_log(
        State(controller): State<Arc<JournalController>>,
    ) -> AppResult<Json<EntriesResponse>> {
        entries(&controller.status_journal).await
    }

    /// GET /api/error/log
    pub async fn error_log(
        State(controller): State<Arc<JournalController>>,
    ) -> AppResult<Json<EntriesResponse>> {
        entries(&controller.error_journal).await
    }
}

async fn entries(journal: &LogJournal) -> AppResult<Json<EntriesResponse>> {
    let entries = journal.entries().await?;
    Ok(Json(EntriesResponse {
        status: "ok",
        count: entries.len(),
        entries,
    }))
}
