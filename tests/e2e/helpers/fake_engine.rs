use async_trait::async_trait;
use songtape::domain::audio::{AssemblyError, ExportSettings, LoudnessTarget, RenderJob};
use songtape::infrastructure::repositories::AudioEngine;
use std::path::Path;
use std::time::Duration;

/// Audio engine where one byte of file is one millisecond of audio.
///
/// Renders by concatenating the inputs, so the output keeps every input's
/// bytes in merge order.
#[derive(Default)]
pub struct ConcatEngine;

#[async_trait]
impl AudioEngine for ConcatEngine {
    async fn probe_duration(&self, path: &Path) -> Result<Duration, AssemblyError> {
        let len = tokio::fs::metadata(path).await?.len();
        Ok(Duration::from_millis(len))
    }

    async fn render(&self, job: &RenderJob) -> Result<(), AssemblyError> {
        let mut out = Vec::new();
        for input in &job.inputs {
            out.extend(tokio::fs::read(input).await?);
        }
        tokio::fs::write(&job.output, out).await?;
        Ok(())
    }

    async fn normalize(
        &self,
        input: &Path,
        output: &Path,
        _target: &LoudnessTarget,
        _export: &ExportSettings,
    ) -> Result<(), AssemblyError> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}
