use crate::domain::audio::{AssemblyError, ExportSettings, LoudnessTarget, RenderJob};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// External engine that decodes, mixes and encodes audio files.
///
/// Implementations are responsible for:
/// - Reading the length of an encoded file
/// - Rendering a job: blending each boundary over its (already clamped) overlap
///   and encoding the result with the job's export settings
/// - Running the loudness filter over a single file
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Whether the engine's tools can be run at all
    async fn is_available(&self) -> bool {
        true
    }

    async fn probe_duration(&self, path: &Path) -> Result<Duration, AssemblyError>;

    async fn render(&self, job: &RenderJob) -> Result<(), AssemblyError>;

    async fn normalize(
        &self,
        input: &Path,
        output: &Path,
        target: &LoudnessTarget,
        export: &ExportSettings,
    ) -> Result<(), AssemblyError>;
}
