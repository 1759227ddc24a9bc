pub mod audio_engine;
pub mod ffmpeg_engine;
pub mod http_tts_repository;
pub mod log_repository;
pub mod output_repository;
pub mod tts_repository;

pub use audio_engine::AudioEngine;
pub use ffmpeg_engine::FfmpegEngine;
pub use http_tts_repository::HttpTtsRepository;
pub use log_repository::{LogJournal, ERROR_LOG_FILE, STATUS_LOG_FILE};
pub use output_repository::{audio_content_type, DirectoryStats, OutputDirectory};
pub use tts_repository::TtsRepository;
