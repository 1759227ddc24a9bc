use super::error::AssemblyError;
use crate::domain::plan::CollisionPolicy;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// An audio file produced by synthesis or by a merge stage
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    pub name: String,
    pub path: PathBuf,
    /// Known length, when the producing stage measured or planned it
    pub duration: Option<Duration>,
}

impl AudioArtifact {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

/// Apply the collision policy to an output path that is about to be written
pub async fn guard_output(path: &Path, policy: CollisionPolicy) -> Result<(), AssemblyError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(());
    }
    match policy {
        CollisionPolicy::Overwrite => {
            tracing::warn!(path = %path.display(), "Overwriting existing artifact");
            Ok(())
        }
        CollisionPolicy::Fail => Err(AssemblyError::Collision(path.to_path_buf())),
    }
}
