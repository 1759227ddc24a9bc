use super::audio_engine::AudioEngine;
use crate::domain::audio::{
    AssemblyError, ExportSettings, LoudnessTarget, RenderJob, MAX_CROSSFADE,
};
use async_trait::async_trait;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

const STDERR_TAIL_LINES: usize = 8;

/// Audio engine backed by the ffmpeg and ffprobe executables
pub struct FfmpegEngine {
    ffmpeg_path: String,
    ffprobe_path: String,
    timeout: Duration,
}

impl FfmpegEngine {
    pub fn new(ffmpeg_path: String, ffprobe_path: String, timeout: Duration) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            timeout,
        }
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<Output, AssemblyError> {
        tracing::debug!(tool = program, args = ?args, "Running external tool");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AssemblyError::ToolMissing(program.to_string())
                } else {
                    AssemblyError::Io(e)
                }
            })?;

        // Dropping the pending future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!(
                    tool = program,
                    timeout_secs = self.timeout.as_secs(),
                    "External tool timed out, killed"
                );
                return Err(AssemblyError::Timeout {
                    tool: program.to_string(),
                    after: self.timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(AssemblyError::ToolFailed {
                tool: program.to_string(),
                status: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl AudioEngine for FfmpegEngine {
    /// Whether `ffmpeg -version` runs successfully
    async fn is_available(&self) -> bool {
        match self.run(&self.ffmpeg_path, &["-version".to_string()]).await {
            Ok(output) => {
                let banner = String::from_utf8_lossy(&output.stdout);
                tracing::debug!(
                    version = banner.lines().next().unwrap_or_default(),
                    "ffmpeg available"
                );
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "ffmpeg unavailable");
                false
            }
        }
    }

    async fn probe_duration(&self, path: &Path) -> Result<Duration, AssemblyError> {
        let output = self.run(&self.ffprobe_path, &probe_args(path)).await?;
        parse_probe_duration(&String::from_utf8_lossy(&output.stdout)).map_err(|reason| {
            AssemblyError::Probe {
                path: path.to_path_buf(),
                reason,
            }
        })
    }

    async fn render(&self, job: &RenderJob) -> Result<(), AssemblyError> {
        self.run(&self.ffmpeg_path, &render_args(job)).await?;
        Ok(())
    }

    async fn normalize(
        &self,
        input: &Path,
        output: &Path,
        target: &LoudnessTarget,
        export: &ExportSettings,
    ) -> Result<(), AssemblyError> {
        self.run(&self.ffmpeg_path, &normalize_args(input, output, target, export))
            .await?;
        Ok(())
    }
}

fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "default=noprint_wrappers=1:nokey=1".to_string(),
        path_arg(path),
    ]
}

fn parse_probe_duration(stdout: &str) -> Result<Duration, String> {
    let raw = stdout.trim();
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("unexpected ffprobe output: {:?}", raw))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration {}: {}", secs, e))
}

/// Filter graph that resamples every input and joins them in order.
///
/// Returns `None` for a single input, which is re-encoded directly.
// acrossfade reads d=0 as its 1s default, so anything under a millisecond concatenates
fn is_concat(overlap: &Duration) -> bool {
    overlap.as_millis() == 0
}

fn filter_graph(crossfades: &[Duration], sample_rate: u32) -> Option<String> {
    if crossfades.is_empty() {
        return None;
    }
    let input_count = crossfades.len() + 1;

    let mut chains: Vec<String> = (0..input_count)
        .map(|i| {
            format!(
                "[{i}:a]aformat=sample_rates={sample_rate}:channel_layouts=stereo[a{i}]"
            )
        })
        .collect();

    if crossfades.iter().all(is_concat) {
        let labels: String = (0..input_count).map(|i| format!("[a{i}]")).collect();
        chains.push(format!("{labels}concat=n={input_count}:v=0:a=1[out]"));
        return Some(chains.join(";"));
    }

    let mut current = "a0".to_string();
    for (index, overlap) in crossfades.iter().enumerate() {
        let next = index + 1;
        let label = if next == input_count - 1 {
            "out".to_string()
        } else {
            format!("m{next}")
        };
        let step = if is_concat(overlap) {
            format!("[{current}][a{next}]concat=n=2:v=0:a=1[{label}]")
        } else {
            format!(
                "[{current}][a{next}]acrossfade=d={:.3}:c1=tri:c2=tri[{label}]",
                (*overlap).min(MAX_CROSSFADE).as_secs_f64()
            )
        };
        chains.push(step);
        current = label;
    }

    Some(chains.join(";"))
}

fn render_args(job: &RenderJob) -> Vec<String> {
    let mut args = base_args();
    for input in &job.inputs {
        args.push("-i".to_string());
        args.push(path_arg(input));
    }
    if let Some(graph) = filter_graph(&job.crossfades, job.export.sample_rate) {
        args.extend([
            "-filter_complex".to_string(),
            graph,
            "-map".to_string(),
            "[out]".to_string(),
        ]);
    }
    args.extend(export_args(&job.export));
    args.push(path_arg(&job.output));
    args
}

fn normalize_args(
    input: &Path,
    output: &Path,
    target: &LoudnessTarget,
    export: &ExportSettings,
) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-i".to_string(),
        path_arg(input),
        "-af".to_string(),
        format!(
            "loudnorm=I={}:TP={}:LRA={}",
            target.integrated_lufs, target.true_peak_dbtp, target.loudness_range_lu
        ),
    ]);
    args.extend(export_args(export));
    args.push(path_arg(output));
    args
}

fn base_args() -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-nostdin".to_string(),
        "-y".to_string(),
    ]
}

fn export_args(export: &ExportSettings) -> Vec<String> {
    vec![
        "-ar".to_string(),
        export.sample_rate.to_string(),
        "-ac".to_string(),
        export.channels.to_string(),
        "-b:a".to_string(),
        export.bitrate.clone(),
        "-f".to_string(),
        export.format.clone(),
    ]
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
