use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    // Pipeline files
    pub plan_path: PathBuf,
    pub output_dir: PathBuf,
    pub segments_dir: PathBuf,
    // External audio tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub process_timeout: Duration,
    // TTS
    pub tts_concurrency: usize,
    pub tts_cache_enabled: bool,
    pub retry_base_delay: Duration,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("API_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            plan_path: env::var("PLAN_PATH")
                .unwrap_or_else(|_| "final.json".to_string())
                .into(),
            output_dir: env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "audio_output".to_string())
                .into(),
            segments_dir: env::var("SEGMENTS_DIR")
                .unwrap_or_else(|_| "audio_segments".to_string())
                .into(),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            process_timeout: Duration::from_secs(
                env::var("PROCESS_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()?,
            ),
            tts_concurrency: env::var("TTS_CONCURRENCY")
                .unwrap_or_else(|_| "1".to_string())
                .parse::<usize>()?
                .max(1),
            tts_cache_enabled: env::var("TTS_CACHE_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<String>()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            retry_base_delay: Duration::from_millis(
                env::var("RETRY_BASE_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()?,
            ),
        };

        Ok(config)
    }
}
