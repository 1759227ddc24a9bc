use super::error::{AttemptFailure, TtsError};
use super::model::{EndpointRole, SynthesisRequest, SynthesizedAudio};
use super::retry::{RetryPolicy, RetryState};
use crate::infrastructure::repositories::TtsRepository;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Synthesized audio keyed by the full voice request. Shared between runs so
/// repeated lines are only synthesized once per process.
pub type SynthesisCache = Cache<SynthesisRequest, SynthesizedAudio>;

pub fn new_synthesis_cache() -> SynthesisCache {
    Cache::builder()
        .max_capacity(512)
        .time_to_idle(Duration::from_secs(30 * 60))
        .build()
}

/// Synthesizes segments against a primary endpoint with a fallback
pub struct TtsClient {
    primary: Arc<dyn TtsRepository>,
    fallback: Arc<dyn TtsRepository>,
    policy: RetryPolicy,
    cache: Option<SynthesisCache>,
}

impl TtsClient {
    pub fn new(
        primary: Arc<dyn TtsRepository>,
        fallback: Arc<dyn TtsRepository>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            primary,
            fallback,
            policy,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: SynthesisCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn repository(&self, role: EndpointRole) -> &Arc<dyn TtsRepository> {
        match role {
            EndpointRole::Primary => &self.primary,
            EndpointRole::Fallback => &self.fallback,
        }
    }

    /// Synthesize one segment, retrying the primary endpoint and then the
    /// fallback before giving up.
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesizedAudio, TtsError> {
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(request).await {
                tracing::info!(
                    voice = %request.voice,
                    text_length = request.text.len(),
                    cached_audio_size = cached.bytes.len(),
                    "TTS cache hit - reusing synthesized audio"
                );
                return Ok(cached);
            }
        }

        let max_retries = self.policy.max_retries();
        let mut state = RetryState::start();
        let mut attempts = 0;
        let mut last_failure = None;

        while let Some((role, attempt)) = state.current() {
            let repository = self.repository(role);
            attempts += 1;
            let start_time = std::time::Instant::now();

            match repository.synthesize(request).await {
                Ok(audio) => {
                    tracing::info!(
                        endpoint_role = %role,
                        endpoint = repository.endpoint(),
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        latency_ms = start_time.elapsed().as_millis(),
                        audio_size_bytes = audio.bytes.len(),
                        "TTS attempt succeeded"
                    );
                    if let Some(cache) = &self.cache {
                        cache.insert(request.clone(), audio.clone()).await;
                    }
                    return Ok(audio);
                }
                Err(failure) => {
                    tracing::warn!(
                        endpoint_role = %role,
                        endpoint = repository.endpoint(),
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        error_class = failure.class(),
                        error = %failure,
                        "TTS attempt failed"
                    );

                    let (next, delay) = state.on_failure(&self.policy);
                    if matches!(state, RetryState::Primary { .. })
                        && matches!(next, RetryState::Fallback { .. })
                    {
                        tracing::warn!(
                            endpoint = self.fallback.endpoint(),
                            "Primary TTS endpoint exhausted, trying fallback"
                        );
                    }
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }

                    last_failure = Some(failure);
                    state = next;
                }
            }
        }

        let last = last_failure
            .unwrap_or_else(|| AttemptFailure::Other("no attempt was made".to_string()));
        tracing::error!(
            attempts = attempts,
            error_class = last.class(),
            error = %last,
            "TTS synthesis failed on both endpoints"
        );
        Err(TtsError::Exhausted { attempts, last })
    }
}
