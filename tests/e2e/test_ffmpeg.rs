use songtape::domain::audio::{AudioArtifact, AudioAssembler, ExportSettings};
use songtape::domain::plan::CollisionPolicy;
use songtape::infrastructure::repositories::{AudioEngine, FfmpegEngine};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn engine() -> Arc<FfmpegEngine> {
    Arc::new(FfmpegEngine::new(
        "ffmpeg".to_string(),
        "ffprobe".to_string(),
        Duration::from_secs(60),
    ))
}

async fn sine(path: &Path, frequency: u32, seconds: u32) {
    let status = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-hide_banner", "-loglevel", "error", "-f", "lavfi", "-i"])
        .arg(format!("sine=frequency={}:duration={}", frequency, seconds))
        .arg(path)
        .status()
        .await
        .unwrap();
    assert!(status.success(), "ffmpeg could not generate test tone");
}

#[tokio::test]
async fn it_should_crossfade_real_audio_with_ffmpeg() {
    let engine = engine();
    if !engine.is_available().await {
        eprintln!("ffmpeg not installed, skipping");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.mp3");
    let second = dir.path().join("second.mp3");
    sine(&first, 440, 3).await;
    sine(&second, 660, 2).await;

    let assembler = AudioAssembler::new(
        engine.clone(),
        ExportSettings::default(),
        CollisionPolicy::Overwrite,
    );
    let output = dir.path().join("merged.mp3");
    let merged = assembler
        .merge(
            &[AudioArtifact::new(first), AudioArtifact::new(second)],
            Duration::from_millis(500),
            &output,
        )
        .await
        .unwrap();

    let planned = merged.duration.unwrap().as_secs_f64();
    assert!((planned - 4.5).abs() < 0.1, "planned {}", planned);

    let measured = engine.probe_duration(&output).await.unwrap().as_secs_f64();
    assert!((measured - 4.5).abs() < 0.2, "measured {}", measured);
}

#[tokio::test]
async fn it_should_normalize_real_audio_with_ffmpeg() {
    let engine = engine();
    if !engine.is_available().await {
        eprintln!("ffmpeg not installed, skipping");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let track = dir.path().join("track.mp3");
    sine(&track, 440, 2).await;

    let assembler = AudioAssembler::new(
        engine.clone(),
        ExportSettings::default(),
        CollisionPolicy::Overwrite,
    );
    let normalized = assembler
        .normalize(&AudioArtifact::new(track), -16.0)
        .await
        .unwrap();

    assert!(normalized.path.ends_with("track_normalized.mp3"));
    let measured = engine
        .probe_duration(&normalized.path)
        .await
        .unwrap()
        .as_secs_f64();
    assert!((measured - 2.0).abs() < 0.2, "measured {}", measured);
}
