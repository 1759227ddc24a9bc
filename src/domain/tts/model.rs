use crate::domain::plan::Segment;
use serde::Serialize;

/// Voice parameters for one synthesis call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub emotion: String,
    pub rate: String,
}

impl From<&Segment> for SynthesisRequest {
    fn from(segment: &Segment) -> Self {
        Self {
            text: segment.text.clone(),
            voice: segment.voice.clone(),
            emotion: segment.emotion.clone(),
            rate: segment.rate.clone(),
        }
    }
}

/// Encoded audio returned by an endpoint
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    /// File extension matching the endpoint's response encoding
    pub extension: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    Primary,
    Fallback,
}

impl EndpointRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointRole::Primary => "primary",
            EndpointRole::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
