use anyhow::Context;
use std::process::ExitCode;
use std::sync::Arc;
use songtape::domain::plan::ProductionPlan;
use songtape::infrastructure::cli::{plan_error_exit_code, report_exit_code, EXIT_FAILED};
use songtape::infrastructure::config::Config;
use songtape::infrastructure::logging::init_logging;
use songtape::infrastructure::pipeline::PipelineFactory;
use songtape::infrastructure::repositories::{
    AudioEngine, FfmpegEngine, LogJournal, STATUS_LOG_FILE,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = format!("{:#}", e), "Production aborted");
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_FAILED)
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;
    init_logging(&config);
    let config = Arc::new(config);

    let engine: Arc<dyn AudioEngine> = Arc::new(FfmpegEngine::new(
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        config.process_timeout,
    ));
    if !engine.is_available().await {
        tracing::warn!(
            ffmpeg = %config.ffmpeg_path,
            "ffmpeg not found; merging will fail. Install ffmpeg or set FFMPEG_PATH"
        );
    }

    let plan = match ProductionPlan::load(&config.plan_path).await {
        Ok(plan) => plan,
        Err(e) => {
            let code = plan_error_exit_code(&e);
            if code == EXIT_FAILED {
                return Err(e).context("reading plan");
            }
            tracing::error!(plan = %config.plan_path.display(), error = %e, "Plan rejected");
            return Ok(ExitCode::from(code));
        }
    };

    let factory = PipelineFactory::new(config.clone(), engine);
    let pipeline = factory
        .pipeline(&plan)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let journal = Arc::new(LogJournal::new(config.output_dir.join(STATUS_LOG_FILE)));
    let ctx = factory.run_context().with_journal(journal);

    let cancel = ctx.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling production");
            cancel.cancel();
        }
    });

    let report = pipeline.run(&plan, &ctx).await;

    println!("{}", report.summary());
    for part in &report.parts {
        println!(
            "  {:<16} {:?} ({}/{} segments)",
            part.part_id, part.status, part.segments_succeeded, part.segments_total
        );
    }

    Ok(ExitCode::from(report_exit_code(&report)))
}
