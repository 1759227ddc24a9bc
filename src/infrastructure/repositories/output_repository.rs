use crate::domain::shared::is_safe_file_name;
use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "opus", "aac"];
const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Snapshot of the output and segment directories
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DirectoryStats {
    pub output_files: usize,
    pub segment_files: usize,
    /// Size of the regular files in the output directory, in MiB
    pub output_dir_size: f64,
}

/// Output and segment directories of the pipeline
pub struct OutputDirectory {
    root: PathBuf,
    segments: PathBuf,
}

impl OutputDirectory {
    pub fn new(root: PathBuf, segments: PathBuf) -> Self {
        Self { root, segments }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn segments(&self) -> &Path {
        &self.segments
    }

    /// Create both directories if needed
    pub async fn ensure(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::create_dir_all(&self.segments).await?;
        Ok(())
    }

    /// Path of an existing file inside the output directory.
    ///
    /// Names that could leave the directory are refused.
    pub async fn resolve_output(&self, name: &str) -> AppResult<PathBuf> {
        if !is_safe_file_name(name) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let path = self.root.join(name);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        let root = tokio::fs::canonicalize(&self.root).await?;
        let resolved = tokio::fs::canonicalize(&path).await?;
        if !resolved.starts_with(&root) {
            tracing::warn!(
                requested = name,
                resolved = %resolved.display(),
                "Refusing to serve file outside output directory"
            );
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
        Ok(resolved)
    }

    /// Locate a merge input by name: output directory first, then segments.
    ///
    /// Unknown names resolve to the output directory so the merge reports them
    /// as missing.
    pub async fn resolve_input(&self, name: &str) -> AppResult<PathBuf> {
        if !is_safe_file_name(name) {
            return Err(AppError::BadRequest(format!("Invalid file name: {}", name)));
        }

        let in_output = self.root.join(name);
        if tokio::fs::try_exists(&in_output).await.unwrap_or(false) {
            return Ok(in_output);
        }
        let in_segments = self.segments.join(name);
        if tokio::fs::try_exists(&in_segments).await.unwrap_or(false) {
            return Ok(in_segments);
        }
        Ok(in_output)
    }

    /// Target path for a new file in the output directory
    pub fn output_path(&self, name: &str) -> AppResult<PathBuf> {
        if !is_safe_file_name(name) {
            return Err(AppError::BadRequest(format!("Invalid file name: {}", name)));
        }
        Ok(self.root.join(name))
    }

    pub async fn stats(&self) -> AppResult<DirectoryStats> {
        let (output_files, output_bytes) = scan(&self.root).await?;
        let (segment_files, _) = scan(&self.segments).await?;
        Ok(DirectoryStats {
            output_files,
            segment_files,
            output_dir_size: output_bytes as f64 / BYTES_PER_MIB,
        })
    }
}

/// Count audio files and total regular-file bytes; a missing directory is empty
async fn scan(dir: &Path) -> AppResult<(usize, u64)> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((0, 0)),
        Err(e) => return Err(e.into()),
    };

    let mut audio_files = 0;
    let mut bytes = 0;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        bytes += metadata.len();
        if is_audio_file(&entry.path()) {
            audio_files += 1;
        }
    }
    Ok((audio_files, bytes))
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Content type for serving an audio file
pub fn audio_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("ogg") | Some("opus") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("aac") => "audio/aac",
        Some("json") => "application/json",
        _ => "audio/mpeg",
    }
}
