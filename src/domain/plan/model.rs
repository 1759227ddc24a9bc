use super::error::PlanError;
use crate::domain::shared::{is_safe_file_name, normalized_file_name, segment_stem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_VOICE: &str = "en-US-AriaNeural";
pub const DEFAULT_EMOTION: &str = "neutral";
pub const DEFAULT_RATE: &str = "normal";
pub const DEFAULT_TARGET_LOUDNESS: f64 = -20.0;
pub const DEFAULT_SPEECH_MODEL: &str = "orpheus";
pub const DEFAULT_RESPONSE_FORMAT: &str = "wav";

/// The full production plan: pipeline configuration plus ordered parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlan {
    pub project: String,
    pub metadata: PlanMetadata,
    pub tts_api_configuration: TtsApiConfiguration,
    pub merge_configuration: MergeConfiguration,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    pub total_duration: String,
    pub output_format: String,
}

/// Request schema spoken by a TTS endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// `{text, lang, emotion, rate}`
    Edge,
    /// `{input, model, voice, response_format, speed}`
    OpenAi,
}

impl EndpointKind {
    /// Legacy routing rule for plans that do not tag their endpoints.
    pub fn infer(url: &str) -> Self {
        if url.contains("edge-tts") || url.contains("localhost:8880") {
            EndpointKind::Edge
        } else {
            EndpointKind::OpenAi
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Edge => "edge",
            EndpointKind::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsApiConfiguration {
    pub endpoint: String,
    pub fallback_endpoint: String,
    /// Per-request timeout in seconds
    pub timeout: u64,
    pub max_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_kind: Option<EndpointKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_endpoint_kind: Option<EndpointKind>,
    #[serde(default = "default_speech_model")]
    pub model: String,
    #[serde(default = "default_response_format")]
    pub response_format: String,
}

impl TtsApiConfiguration {
    pub fn primary_kind(&self) -> EndpointKind {
        self.endpoint_kind
            .unwrap_or_else(|| EndpointKind::infer(&self.endpoint))
    }

    pub fn fallback_kind(&self) -> EndpointKind {
        self.fallback_endpoint_kind
            .unwrap_or_else(|| EndpointKind::infer(&self.fallback_endpoint))
    }

    /// Pin both endpoint kinds so later stages never re-derive them from URLs.
    fn resolve_kinds(&mut self) {
        self.endpoint_kind = Some(self.primary_kind());
        self.fallback_endpoint_kind = Some(self.fallback_kind());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConfiguration {
    pub quality_settings: QualitySettings,
    pub transitions: Transitions,
    pub audio_normalization: AudioNormalization,
    pub output_file: String,
    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySettings {
    pub format: String,
    pub bitrate: String,
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transitions {
    /// Crossfade between parts, in seconds
    pub crossfade_duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioNormalization {
    pub enabled: bool,
    #[serde(default = "default_target_loudness")]
    pub target_loudness: f64,
}

/// What to do when an artifact's output file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    #[default]
    Overwrite,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Target duration in seconds; informational only
    #[serde(default)]
    pub duration: Option<f64>,
    pub output_file: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub text: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_emotion")]
    pub emotion: String,
    #[serde(default = "default_rate")]
    pub rate: String,
    /// Target duration in seconds; informational only
    #[serde(default)]
    pub duration: Option<f64>,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_emotion() -> String {
    DEFAULT_EMOTION.to_string()
}

fn default_rate() -> String {
    DEFAULT_RATE.to_string()
}

fn default_target_loudness() -> f64 {
    DEFAULT_TARGET_LOUDNESS
}

fn default_speech_model() -> String {
    DEFAULT_SPEECH_MODEL.to_string()
}

fn default_response_format() -> String {
    DEFAULT_RESPONSE_FORMAT.to_string()
}

impl ProductionPlan {
    /// Read, parse and validate a plan file.
    pub async fn load(path: &Path) -> Result<Self, PlanError> {
        let raw = Self::read_raw(path).await?;
        Self::from_json(&raw)
    }

    /// Parse and validate a plan document, resolving endpoint kinds.
    pub fn from_json(raw: &str) -> Result<Self, PlanError> {
        let mut plan: ProductionPlan = serde_json::from_str(raw)?;
        plan.validate()?;
        plan.tts_api_configuration.resolve_kinds();
        Ok(plan)
    }

    /// Read the plan as an untyped JSON document, exactly as stored on disk.
    pub async fn read_document(path: &Path) -> Result<serde_json::Value, PlanError> {
        let raw = Self::read_raw(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn read_raw(path: &Path) -> Result<String, PlanError> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PlanError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(PlanError::Io(e)),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.parts.iter().map(|p| p.segments.len()).sum()
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        let tts = &self.tts_api_configuration;
        if tts.max_retries == 0 {
            return Err(invalid("ttsApiConfiguration.maxRetries must be at least 1"));
        }
        if tts.timeout == 0 {
            return Err(invalid("ttsApiConfiguration.timeout must be at least 1 second"));
        }
        if tts.endpoint.trim().is_empty() || tts.fallback_endpoint.trim().is_empty() {
            return Err(invalid("ttsApiConfiguration endpoints must not be empty"));
        }

        let merge = &self.merge_configuration;
        let crossfade = merge.transitions.crossfade_duration;
        if !crossfade.is_finite() || crossfade < 0.0 {
            return Err(invalid(
                "mergeConfiguration.transitions.crossfadeDuration must be a non-negative number",
            ));
        }
        if merge.quality_settings.sample_rate == 0 {
            return Err(invalid("mergeConfiguration.qualitySettings.sampleRate must be positive"));
        }
        if !merge.audio_normalization.target_loudness.is_finite() {
            return Err(invalid("mergeConfiguration.audioNormalization.targetLoudness must be finite"));
        }
        if !is_safe_file_name(&merge.output_file) {
            return Err(PlanError::Invalid(format!(
                "mergeConfiguration.outputFile '{}' is not a plain file name",
                merge.output_file
            )));
        }

        if self.parts.is_empty() {
            return Err(invalid("plan must contain at least one part"));
        }

        let mut part_ids = HashSet::new();
        let mut output_files = HashSet::new();
        output_files.insert(merge.output_file.clone());
        if merge.audio_normalization.enabled {
            output_files.insert(normalized_file_name(&merge.output_file));
        }
        let mut segment_stems = HashSet::new();

        for part in &self.parts {
            if !is_safe_file_name(&part.id) {
                return Err(PlanError::Invalid(format!(
                    "part id '{}' must be a plain identifier",
                    part.id
                )));
            }
            if !part_ids.insert(part.id.as_str()) {
                return Err(PlanError::Invalid(format!("duplicate part id '{}'", part.id)));
            }
            if !is_safe_file_name(&part.output_file) {
                return Err(PlanError::Invalid(format!(
                    "part '{}' outputFile '{}' is not a plain file name",
                    part.id, part.output_file
                )));
            }
            if !output_files.insert(part.output_file.clone()) {
                return Err(PlanError::Invalid(format!(
                    "part '{}' outputFile '{}' collides with another output",
                    part.id, part.output_file
                )));
            }

            let mut segment_ids = HashSet::new();
            for segment in &part.segments {
                if !is_safe_file_name(&segment.id) {
                    return Err(PlanError::Invalid(format!(
                        "segment id '{}' in part '{}' must be a plain identifier",
                        segment.id, part.id
                    )));
                }
                if !segment_ids.insert(segment.id.as_str()) {
                    return Err(PlanError::Invalid(format!(
                        "duplicate segment id '{}' in part '{}'",
                        segment.id, part.id
                    )));
                }
                let stem = segment_stem(&part.id, &segment.id);
                if !segment_stems.insert(stem.clone()) {
                    return Err(PlanError::Invalid(format!(
                        "segment '{}' in part '{}' shares artifact name '{}' with another segment",
                        segment.id, part.id, stem
                    )));
                }
                if segment.text.trim().is_empty() {
                    return Err(PlanError::Invalid(format!(
                        "segment '{}' in part '{}' has empty text",
                        segment.id, part.id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: &str) -> PlanError {
    PlanError::Invalid(message.to_string())
}
