use super::artifact::{guard_output, AudioArtifact};
use super::crossfade::plan_crossfades;
use super::error::AssemblyError;
use super::settings::{ExportSettings, LoudnessTarget, RenderJob};
use crate::domain::plan::CollisionPolicy;
use crate::domain::shared::normalized_file_name;
use crate::infrastructure::repositories::AudioEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Merges ordered artifacts into one file and normalizes loudness
pub struct AudioAssembler {
    engine: Arc<dyn AudioEngine>,
    export: ExportSettings,
    collision: CollisionPolicy,
}

impl AudioAssembler {
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        export: ExportSettings,
        collision: CollisionPolicy,
    ) -> Self {
        Self {
            engine,
            export,
            collision,
        }
    }

    pub fn export(&self) -> &ExportSettings {
        &self.export
    }

    /// Merge `inputs` in order into `output`, blending each boundary over
    /// `crossfade` (clamped to the adjoining lengths).
    ///
    /// Fails without writing anything if the list is empty or any input is
    /// missing.
    pub async fn merge(
        &self,
        inputs: &[AudioArtifact],
        crossfade: Duration,
        output: &Path,
    ) -> Result<AudioArtifact, AssemblyError> {
        if inputs.is_empty() {
            return Err(AssemblyError::EmptyInput);
        }

        let mut missing = Vec::new();
        for input in inputs {
            if !input.exists().await {
                missing.push(input.path.clone());
            }
        }
        if !missing.is_empty() {
            tracing::error!(
                missing = ?missing,
                output = %output.display(),
                "Merge aborted: inputs missing"
            );
            return Err(AssemblyError::MissingInput(missing));
        }

        guard_output(output, self.collision).await?;

        let mut durations = Vec::with_capacity(inputs.len());
        for input in inputs {
            let duration = match input.duration {
                Some(known) => known,
                None => self.engine.probe_duration(&input.path).await?,
            };
            tracing::debug!(
                input = %input.name,
                duration_ms = duration.as_millis(),
                "Loaded merge input"
            );
            durations.push(duration);
        }

        let plan = plan_crossfades(&durations, crossfade);
        for (index, (requested, effective)) in std::iter::repeat(crossfade)
            .zip(plan.boundaries.iter())
            .enumerate()
        {
            if *effective < requested {
                tracing::warn!(
                    boundary = index + 1,
                    requested_ms = requested.as_millis(),
                    effective_ms = effective.as_millis(),
                    "Crossfade longer than adjoining audio, clamped"
                );
            }
        }

        tracing::info!(
            input_count = inputs.len(),
            crossfade_ms = crossfade.as_millis(),
            output = %output.display(),
            "Merging audio"
        );

        let job = RenderJob {
            inputs: inputs.iter().map(|a| a.path.clone()).collect(),
            crossfades: plan.boundaries,
            output: output.to_path_buf(),
            export: self.export.clone(),
        };
        self.engine.render(&job).await?;

        tracing::info!(
            output = %output.display(),
            total_secs = format!("{:.1}", plan.total.as_secs_f64()),
            "Merged audio saved"
        );

        Ok(AudioArtifact::new(output.to_path_buf()).with_duration(plan.total))
    }

    /// Loudness-normalize `input` into `<stem>_normalized.<ext>` beside it
    pub async fn normalize(
        &self,
        input: &AudioArtifact,
        target_loudness: f64,
    ) -> Result<AudioArtifact, AssemblyError> {
        if !input.exists().await {
            return Err(AssemblyError::MissingInput(vec![input.path.clone()]));
        }

        let output = normalized_path(&input.path);
        guard_output(&output, self.collision).await?;

        tracing::info!(
            input = %input.path.display(),
            target_lufs = target_loudness,
            "Normalizing audio"
        );

        let target = LoudnessTarget::new(target_loudness);
        self.engine
            .normalize(&input.path, &output, &target, &self.export)
            .await?;

        tracing::info!(output = %output.display(), "Audio normalized");

        let mut artifact = AudioArtifact::new(output);
        artifact.duration = input.duration;
        Ok(artifact)
    }
}

pub fn normalized_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(normalized_file_name(&file_name))
}
