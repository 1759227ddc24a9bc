use serde_json::{json, Value};
use std::path::PathBuf;

/// Writes production plans for tests
pub struct PlanFixtures {
    plan_path: PathBuf,
    primary_url: String,
    fallback_url: String,
}

impl PlanFixtures {
    pub fn new(plan_path: PathBuf, primary_url: String, fallback_url: String) -> Self {
        Self {
            plan_path,
            primary_url,
            fallback_url,
        }
    }

    /// Plan with the given parts, pointing at the fake TTS endpoints
    pub fn plan(&self, parts: Value, normalize: bool) -> Value {
        json!({
            "project": "Test Song",
            "metadata": { "totalDuration": "0:42", "outputFormat": "mp3" },
            "ttsApiConfiguration": {
                "endpoint": self.primary_url,
                "fallbackEndpoint": self.fallback_url,
                "endpointKind": "edge",
                "fallbackEndpointKind": "openai",
                "timeout": 5,
                "maxRetries": 2
            },
            "mergeConfiguration": {
                "qualitySettings": { "format": "mp3", "bitrate": "192k", "sampleRate": 44100 },
                "transitions": { "crossfadeDuration": 0.0 },
                "audioNormalization": { "enabled": normalize, "targetLoudness": -16 },
                "outputFile": "final.mp3"
            },
            "parts": parts
        })
    }

    /// Two parts: intro (two segments) and verse (one segment)
    pub fn song_parts(&self) -> Value {
        json!([
            {
                "id": "intro",
                "name": "Intro",
                "description": "Opening lines",
                "duration": 10,
                "outputFile": "intro.mp3",
                "segments": [
                    { "id": "s1", "text": "hello", "voice": "en-GB-SoniaNeural", "rate": "slow", "duration": 5 },
                    { "id": "s2", "text": "world", "duration": 5 }
                ]
            },
            {
                "id": "verse",
                "name": "Verse",
                "description": "First verse",
                "duration": 20,
                "outputFile": "verse.mp3",
                "segments": [
                    { "id": "s1", "text": "again", "emotion": "cheerful", "duration": 20 }
                ]
            }
        ])
    }

    pub async fn write(&self, plan: &Value) {
        tokio::fs::write(&self.plan_path, serde_json::to_vec_pretty(plan).unwrap())
            .await
            .expect("Failed to write plan");
    }

    pub async fn write_raw(&self, raw: &str) {
        tokio::fs::write(&self.plan_path, raw)
            .await
            .expect("Failed to write plan");
    }

    pub async fn write_song(&self, normalize: bool) {
        self.write(&self.plan(self.song_parts(), normalize)).await;
    }
}
