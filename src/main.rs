use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use songtape::controllers::{
    config::ConfigController, journal::JournalController, output::OutputController,
    production::ProductionController,
};
use songtape::infrastructure::config::Config;
use songtape::infrastructure::http::{create_router, start_http_server};
use songtape::infrastructure::logging::init_logging;
use songtape::infrastructure::pipeline::PipelineFactory;
use songtape::infrastructure::repositories::{
    AudioEngine, FfmpegEngine, LogJournal, OutputDirectory, ERROR_LOG_FILE, STATUS_LOG_FILE,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting songtape API on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        output_dir = %config.output_dir.display(),
        segments_dir = %config.segments_dir.display(),
        plan = %config.plan_path.display(),
        tts_concurrency = config.tts_concurrency,
        tts_cache_enabled = config.tts_cache_enabled,
        "Pipeline configuration"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let output = Arc::new(OutputDirectory::new(
        config.output_dir.clone(),
        config.segments_dir.clone(),
    ));
    output.ensure().await?;
    let status_journal = Arc::new(LogJournal::new(config.output_dir.join(STATUS_LOG_FILE)));
    let error_journal = Arc::new(LogJournal::new(config.output_dir.join(ERROR_LOG_FILE)));

    let engine: Arc<dyn AudioEngine> = Arc::new(FfmpegEngine::new(
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        config.process_timeout,
    ));
    if !engine.is_available().await {
        tracing::warn!(
            ffmpeg = %config.ffmpeg_path,
            "ffmpeg not found; merge and produce requests will fail until it is installed"
        );
    }

    // 2. Pipeline wiring
    let factory = Arc::new(PipelineFactory::new(config.clone(), engine.clone()));
    let shutdown = CancellationToken::new();

    // 3. Controllers
    let config_controller = Arc::new(ConfigController::new(config.plan_path.clone()));
    let production_controller = Arc::new(ProductionController::new(
        factory,
        output.clone(),
        status_journal.clone(),
        config.plan_path.clone(),
        shutdown.clone(),
    ));
    let journal_controller = Arc::new(JournalController::new(status_journal, error_journal));
    let output_controller = Arc::new(OutputController::new(output));

    let app = create_router(
        engine,
        config_controller,
        production_controller,
        journal_controller,
        output_controller,
    );

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested, cancelling running productions");
            signal.cancel();
        }
    });

    start_http_server(config, app, shutdown).await?;

    Ok(())
}
