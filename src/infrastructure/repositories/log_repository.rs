use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub const STATUS_LOG_FILE: &str = "status_log.json";
pub const ERROR_LOG_FILE: &str = "error_log.json";

/// Append-only JSON-lines log file
pub struct LogJournal {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LogJournal {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single JSON line
    pub async fn append<T: Serialize>(&self, entry: &T) -> AppResult<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| AppError::Internal(format!("Failed to encode log entry: {}", e)))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), "Journal entry appended");
        Ok(())
    }

    /// All entries in append order; a missing file is an empty journal
    pub async fn entries(&self) -> AppResult<Vec<serde_json::Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(value) => entries.push(value),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping unreadable journal line"
                ),
            }
        }
        Ok(entries)
    }
}
