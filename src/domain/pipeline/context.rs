use crate::domain::shared::{segment_stem, StatusRecord, StatusUpdate};
use crate::infrastructure::repositories::LogJournal;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Everything a single production run needs besides the plan
#[derive(Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub output_dir: PathBuf,
    pub segments_dir: PathBuf,
    pub journal: Option<Arc<LogJournal>>,
    pub cancel: CancellationToken,
}

impl RunContext {
    pub fn new(output_dir: PathBuf, segments_dir: PathBuf) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            output_dir,
            segments_dir,
            journal: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_journal(mut self, journal: Arc<LogJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// `<segments_dir>/<partId>_<segmentId>.<ext>`
    pub fn segment_path(&self, part_id: &str, segment_id: &str, extension: &str) -> PathBuf {
        self.segments_dir
            .join(format!("{}.{}", segment_stem(part_id, segment_id), extension))
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        create_dir(&self.output_dir).await?;
        create_dir(&self.segments_dir).await
    }

    /// Append a status entry to the run journal, if any. Journal failures are
    /// logged and never affect the run.
    pub async fn record(&self, update: StatusUpdate) {
        let Some(journal) = &self.journal else {
            return;
        };
        let record = StatusRecord {
            update,
            recorded_at: Utc::now(),
        };
        if let Err(e) = journal.append(&record).await {
            tracing::warn!(
                run_id = %self.run_id,
                journal = %journal.path().display(),
                error = %e,
                "Failed to write run status"
            );
        }
    }
}

async fn create_dir(path: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}
