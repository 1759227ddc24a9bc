use super::tts_repository::TtsRepository;
use crate::domain::plan::EndpointKind;
use crate::domain::tts::voice::{lang_for_voice, prosody_rate, speech_speed};
use crate::domain::tts::{AttemptFailure, SynthesisRequest, SynthesizedAudio};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Body for Edge-style prosody endpoints
#[derive(Debug, Serialize)]
struct ProsodyPayload<'a> {
    text: &'a str,
    lang: String,
    emotion: &'a str,
    rate: String,
}

/// Body for OpenAI-compatible `/v1/audio/speech` endpoints
#[derive(Debug, Serialize)]
struct SpeechPayload<'a> {
    input: &'a str,
    model: &'a str,
    voice: &'a str,
    response_format: &'a str,
    speed: f32,
}

/// TTS endpoint reached over HTTP; the request body follows `kind`
pub struct HttpTtsRepository {
    client: Client,
    url: String,
    kind: EndpointKind,
    model: String,
    response_format: String,
}

impl HttpTtsRepository {
    pub fn new(
        url: String,
        kind: EndpointKind,
        timeout: Duration,
        model: String,
        response_format: String,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            kind,
            model,
            response_format,
        })
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    fn payload(&self, request: &SynthesisRequest) -> serde_json::Value {
        let body = match self.kind {
            EndpointKind::Edge => serde_json::to_value(ProsodyPayload {
                text: &request.text,
                lang: lang_for_voice(&request.voice),
                emotion: &request.emotion,
                rate: prosody_rate(&request.rate),
            }),
            EndpointKind::OpenAi => serde_json::to_value(SpeechPayload {
                input: &request.text,
                model: &self.model,
                voice: &request.voice,
                response_format: &self.response_format,
                speed: speech_speed(&request.rate),
            }),
        };
        body.unwrap_or(serde_json::Value::Null)
    }

    fn extension(&self) -> String {
        match self.kind {
            EndpointKind::Edge => "mp3".to_string(),
            EndpointKind::OpenAi => self.response_format.clone(),
        }
    }
}

fn classify(err: &reqwest::Error) -> AttemptFailure {
    if err.is_timeout() {
        AttemptFailure::Timeout
    } else if err.is_connect() {
        AttemptFailure::Connection(err.to_string())
    } else {
        AttemptFailure::Other(err.to_string())
    }
}

#[async_trait]
impl TtsRepository for HttpTtsRepository {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesizedAudio, AttemptFailure> {
        let start_time = std::time::Instant::now();

        tracing::debug!(
            endpoint = %self.url,
            kind = %self.kind,
            voice = %request.voice,
            text_length = request.text.len(),
            text_preview = %request.text.chars().take(80).collect::<String>(),
            "Calling TTS endpoint"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptFailure::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| classify(&e))?;
        if bytes.is_empty() {
            return Err(AttemptFailure::Other("endpoint returned an empty body".to_string()));
        }

        tracing::debug!(
            endpoint = %self.url,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = bytes.len(),
            "TTS endpoint returned audio"
        );

        Ok(SynthesizedAudio {
            bytes: bytes.to_vec(),
            extension: self.extension(),
        })
    }
}
