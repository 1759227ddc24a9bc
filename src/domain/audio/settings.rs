use crate::domain::plan::QualitySettings;
use std::path::PathBuf;
use std::time::Duration;

pub const OUTPUT_CHANNELS: u8 = 2;
pub const TRUE_PEAK_DBTP: f64 = -1.5;
pub const LOUDNESS_RANGE_LU: f64 = 11.0;

/// Encoding of every merged artifact
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub format: String,
    pub bitrate: String,
    pub sample_rate: u32,
    pub channels: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: "mp3".to_string(),
            bitrate: "192k".to_string(),
            sample_rate: 44100,
            channels: OUTPUT_CHANNELS,
        }
    }
}

impl From<&QualitySettings> for ExportSettings {
    fn from(quality: &QualitySettings) -> Self {
        Self {
            format: quality.format.clone(),
            bitrate: quality.bitrate.clone(),
            sample_rate: quality.sample_rate,
            channels: OUTPUT_CHANNELS,
        }
    }
}

/// Loudness filter parameters; only the integrated target is configurable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessTarget {
    pub integrated_lufs: f64,
    pub true_peak_dbtp: f64,
    pub loudness_range_lu: f64,
}

impl LoudnessTarget {
    pub fn new(integrated_lufs: f64) -> Self {
        Self {
            integrated_lufs,
            true_peak_dbtp: TRUE_PEAK_DBTP,
            loudness_range_lu: LOUDNESS_RANGE_LU,
        }
    }
}

/// One merge handed to the audio engine
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub inputs: Vec<PathBuf>,
    /// Effective overlap at each boundary, already clamped
    pub crossfades: Vec<Duration>,
    pub output: PathBuf,
    pub export: ExportSettings,
}
