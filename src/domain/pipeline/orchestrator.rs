use super::context::RunContext;
use super::report::{PartReport, PartStatus, PipelineFailure, RunReport, RunState};
use crate::domain::audio::{crossfade_from_secs, AssemblyError, AudioArtifact, AudioAssembler};
use crate::domain::plan::{Part, ProductionPlan, Segment};
use crate::domain::shared::StatusUpdate;
use crate::domain::tts::{SynthesisRequest, TtsClient, TtsError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Crossfade between segments inside one part
pub const PART_CROSSFADE: Duration = Duration::from_millis(500);

enum SegmentOutcome {
    Ready(AudioArtifact),
    Dropped,
    Cancelled,
}

/// Final artifact of a successful run
struct Produced {
    output: AudioArtifact,
    normalized: bool,
}

/// Drives synthesis and the three merge levels over a plan
pub struct ProductionPipeline {
    tts: Arc<TtsClient>,
    assembler: Arc<AudioAssembler>,
    concurrency: usize,
}

impl ProductionPipeline {
    pub fn new(tts: Arc<TtsClient>, assembler: Arc<AudioAssembler>) -> Self {
        Self {
            tts,
            assembler,
            concurrency: 1,
        }
    }

    /// Number of segments of one part synthesized at the same time
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run the whole plan. Never panics on partial failure; the report's
    /// state tells whether a final artifact was produced.
    pub async fn run(&self, plan: &ProductionPlan, ctx: &RunContext) -> RunReport {
        let started = std::time::Instant::now();
        tracing::info!(
            run_id = %ctx.run_id,
            project = %plan.project,
            total_duration = %plan.metadata.total_duration,
            output_format = %plan.metadata.output_format,
            parts = plan.parts.len(),
            segments = plan.segment_count(),
            state = %RunState::PlanLoaded,
            "Production run started"
        );
        ctx.record(StatusUpdate::now(
            "processing",
            Some(format!("Producing {}", plan.project)),
            None,
        ))
        .await;

        let mut parts = Vec::with_capacity(plan.parts.len());
        let result = self.execute(plan, ctx, &mut parts).await;

        let parts_succeeded = parts
            .iter()
            .filter(|p| p.status == PartStatus::Merged)
            .count();
        let mut report = RunReport {
            run_id: ctx.run_id,
            project: plan.project.clone(),
            state: RunState::Done,
            final_output: None,
            normalized: false,
            parts_succeeded,
            parts_total: plan.parts.len(),
            duration_secs: None,
            parts,
            error: None,
            failure: None,
        };

        match result {
            Ok(produced) => {
                report.duration_secs = produced.output.duration.map(|d| d.as_secs_f64());
                report.final_output = Some(produced.output.path);
                report.normalized = produced.normalized;
                tracing::info!(
                    run_id = %ctx.run_id,
                    state = %RunState::Done,
                    parts_succeeded = report.parts_succeeded,
                    parts_total = report.parts_total,
                    elapsed_ms = started.elapsed().as_millis(),
                    "{}",
                    report.summary()
                );
                let output_file = report
                    .final_output
                    .as_ref()
                    .map(|p| p.display().to_string());
                ctx.record(StatusUpdate::now("completed", Some(report.summary()), output_file))
                    .await;
            }
            Err(failure) => {
                report.state = RunState::Failed;
                report.error = Some(failure.to_string());
                tracing::error!(
                    run_id = %ctx.run_id,
                    state = %RunState::Failed,
                    parts_succeeded = report.parts_succeeded,
                    parts_total = report.parts_total,
                    error = %failure,
                    "Production run failed"
                );
                report.failure = Some(failure);
                ctx.record(StatusUpdate::now("failed", report.error.clone(), None))
                    .await;
            }
        }

        report
    }

    async fn execute(
        &self,
        plan: &ProductionPlan,
        ctx: &RunContext,
        reports: &mut Vec<PartReport>,
    ) -> Result<Produced, PipelineFailure> {
        ctx.ensure_dirs().await?;

        tracing::info!(run_id = %ctx.run_id, state = %RunState::GeneratingParts, "Generating parts");
        let mut part_artifacts = Vec::new();
        for part in &plan.parts {
            if ctx.is_cancelled() {
                return Err(PipelineFailure::Cancelled);
            }
            let (report, artifact) = self.produce_part(part, ctx).await?;
            reports.push(report);
            if let Some(artifact) = artifact {
                part_artifacts.push(artifact);
            }
        }

        if part_artifacts.is_empty() {
            return Err(PipelineFailure::NoParts);
        }
        if ctx.is_cancelled() {
            return Err(PipelineFailure::Cancelled);
        }

        let merge = &plan.merge_configuration;
        tracing::info!(
            run_id = %ctx.run_id,
            state = %RunState::MergingParts,
            parts = part_artifacts.len(),
            crossfade_secs = merge.transitions.crossfade_duration,
            "Merging parts into final track"
        );
        let final_artifact = self
            .assembler
            .merge(
                &part_artifacts,
                crossfade_from_secs(merge.transitions.crossfade_duration),
                &ctx.output_path(&merge.output_file),
            )
            .await
            .map_err(PipelineFailure::FinalMerge)?;

        if !merge.audio_normalization.enabled {
            return Ok(Produced {
                output: final_artifact,
                normalized: false,
            });
        }
        if ctx.is_cancelled() {
            return Err(PipelineFailure::Cancelled);
        }

        tracing::info!(
            run_id = %ctx.run_id,
            state = %RunState::Normalizing,
            target_lufs = merge.audio_normalization.target_loudness,
            "Normalizing final track"
        );
        match self
            .assembler
            .normalize(&final_artifact, merge.audio_normalization.target_loudness)
            .await
        {
            Ok(normalized) => Ok(Produced {
                output: normalized,
                normalized: true,
            }),
            Err(e) => {
                tracing::warn!(
                    run_id = %ctx.run_id,
                    error = %e,
                    output = %final_artifact.path.display(),
                    "Normalization failed, keeping un-normalized track"
                );
                Ok(Produced {
                    output: final_artifact,
                    normalized: false,
                })
            }
        }
    }

    /// Synthesize and merge one part. `Ok((report, None))` means the part was
    /// skipped; only cancellation is an error.
    async fn produce_part(
        &self,
        part: &Part,
        ctx: &RunContext,
    ) -> Result<(PartReport, Option<AudioArtifact>), PipelineFailure> {
        tracing::info!(
            part_id = %part.id,
            name = %part.name,
            description = %part.description,
            target_duration_secs = part.duration,
            segments = part.segments.len(),
            "Generating part"
        );

        let pending: Vec<_> = part
            .segments
            .iter()
            .map(|segment| self.produce_segment(part, segment, ctx))
            .collect();
        let outcomes: Vec<SegmentOutcome> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut artifacts = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                SegmentOutcome::Ready(artifact) => artifacts.push(artifact),
                SegmentOutcome::Dropped => {}
                SegmentOutcome::Cancelled => return Err(PipelineFailure::Cancelled),
            }
        }

        let mut report = PartReport {
            part_id: part.id.clone(),
            name: part.name.clone(),
            status: PartStatus::Skipped,
            segments_succeeded: artifacts.len(),
            segments_total: part.segments.len(),
            output_file: None,
            duration_secs: None,
            reason: None,
        };

        if artifacts.is_empty() {
            tracing::error!(
                part_id = %part.id,
                segments_total = report.segments_total,
                "No segments generated, skipping part"
            );
            report.reason = Some("no segments generated".to_string());
            return Ok((report, None));
        }
        if ctx.is_cancelled() {
            return Err(PipelineFailure::Cancelled);
        }

        match self
            .assembler
            .merge(&artifacts, PART_CROSSFADE, &ctx.output_path(&part.output_file))
            .await
        {
            Ok(merged) => {
                tracing::info!(
                    part_id = %part.id,
                    output = %merged.path.display(),
                    segments_succeeded = report.segments_succeeded,
                    segments_total = report.segments_total,
                    duration_secs = merged.duration.map(|d| d.as_secs_f64()),
                    target_duration_secs = part.duration,
                    "Part merged"
                );
                report.status = PartStatus::Merged;
                report.output_file = Some(merged.path.clone());
                report.duration_secs = merged.duration.map(|d| d.as_secs_f64());
                Ok((report, Some(merged)))
            }
            Err(e) => {
                tracing::error!(
                    part_id = %part.id,
                    error = %e,
                    "Part merge failed, skipping part"
                );
                report.reason = Some(e.to_string());
                Ok((report, None))
            }
        }
    }

    async fn produce_segment(
        &self,
        part: &Part,
        segment: &Segment,
        ctx: &RunContext,
    ) -> SegmentOutcome {
        if ctx.is_cancelled() {
            return SegmentOutcome::Cancelled;
        }

        tracing::debug!(
            part_id = %part.id,
            segment_id = %segment.id,
            voice = %segment.voice,
            emotion = %segment.emotion,
            rate = %segment.rate,
            target_duration_secs = segment.duration,
            "Generating segment"
        );

        let request = SynthesisRequest::from(segment);
        let result = tokio::select! {
            _ = ctx.cancel.cancelled() => Err(TtsError::Cancelled),
            result = self.tts.synthesize(&request) => result,
        };

        let audio = match result {
            Ok(audio) => audio,
            Err(TtsError::Cancelled) => return SegmentOutcome::Cancelled,
            Err(e) => {
                tracing::error!(
                    part_id = %part.id,
                    segment_id = %segment.id,
                    error = %e,
                    "Segment unavailable, dropping it from the part"
                );
                return SegmentOutcome::Dropped;
            }
        };

        let path = ctx.segment_path(&part.id, &segment.id, &audio.extension);
        if let Err(e) = tokio::fs::write(&path, &audio.bytes).await {
            tracing::error!(
                part_id = %part.id,
                segment_id = %segment.id,
                path = %path.display(),
                error = %e,
                "Failed to write segment audio, dropping it from the part"
            );
            return SegmentOutcome::Dropped;
        }

        tracing::info!(
            part_id = %part.id,
            segment_id = %segment.id,
            path = %path.display(),
            audio_size_bytes = audio.bytes.len(),
            "Segment generated"
        );
        SegmentOutcome::Ready(AudioArtifact::new(path))
    }
}
