use crate::domain::tts::{AttemptFailure, SynthesisRequest, SynthesizedAudio};
use async_trait::async_trait;

/// Repository for a single TTS endpoint.
/// Abstracts the wire schema of the underlying provider (Edge prosody service,
/// OpenAI-compatible speech API, ...).
///
/// Implementations make exactly one request per call. Retries and fallback
/// are the caller's concern.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Endpoint identity used in logs
    fn endpoint(&self) -> &str;

    /// Synthesize one text segment
    ///
    /// # Errors
    /// Returns the classified failure of this single attempt
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesizedAudio, AttemptFailure>;
}
