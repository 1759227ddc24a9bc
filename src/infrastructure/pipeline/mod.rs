use crate::domain::audio::{AudioAssembler, ExportSettings};
use crate::domain::pipeline::{ProductionPipeline, RunContext};
use crate::domain::plan::{CollisionPolicy, MergeConfiguration, ProductionPlan, TtsApiConfiguration};
use crate::domain::tts::{new_synthesis_cache, RetryPolicy, SynthesisCache, TtsClient};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{AudioEngine, HttpTtsRepository};
use std::sync::Arc;
use std::time::Duration;

/// Wires plan settings and process config into pipeline components.
///
/// One factory lives for the whole process so the synthesis cache is shared
/// between runs.
pub struct PipelineFactory {
    config: Arc<Config>,
    engine: Arc<dyn AudioEngine>,
    cache: Option<SynthesisCache>,
}

impl PipelineFactory {
    pub fn new(config: Arc<Config>, engine: Arc<dyn AudioEngine>) -> Self {
        let cache = config.tts_cache_enabled.then(new_synthesis_cache);
        Self {
            config,
            engine,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tts_client(&self, tts: &TtsApiConfiguration) -> AppResult<TtsClient> {
        let timeout = Duration::from_secs(tts.timeout);
        let primary = HttpTtsRepository::new(
            tts.endpoint.clone(),
            tts.primary_kind(),
            timeout,
            tts.model.clone(),
            tts.response_format.clone(),
        )
        .map_err(|e| AppError::Internal(format!("Failed to build TTS client: {}", e)))?;
        let fallback = HttpTtsRepository::new(
            tts.fallback_endpoint.clone(),
            tts.fallback_kind(),
            timeout,
            tts.model.clone(),
            tts.response_format.clone(),
        )
        .map_err(|e| AppError::Internal(format!("Failed to build TTS client: {}", e)))?;

        tracing::debug!(
            primary = %tts.endpoint,
            primary_kind = %tts.primary_kind(),
            fallback = %tts.fallback_endpoint,
            fallback_kind = %tts.fallback_kind(),
            max_retries = tts.max_retries,
            timeout_secs = tts.timeout,
            cache_enabled = self.cache.is_some(),
            "TTS client configured"
        );

        let client = TtsClient::new(
            Arc::new(primary),
            Arc::new(fallback),
            RetryPolicy::new(tts.max_retries, self.config.retry_base_delay),
        );
        Ok(match &self.cache {
            Some(cache) => client.with_cache(cache.clone()),
            None => client,
        })
    }

    pub fn assembler(&self, merge: &MergeConfiguration) -> AudioAssembler {
        AudioAssembler::new(
            self.engine.clone(),
            ExportSettings::from(&merge.quality_settings),
            merge.on_collision,
        )
    }

    /// Assembler for ad-hoc merges; uses the plan's export settings when a
    /// plan is available
    pub fn merge_assembler(&self, plan: Option<&ProductionPlan>) -> AudioAssembler {
        match plan {
            Some(plan) => self.assembler(&plan.merge_configuration),
            None => AudioAssembler::new(
                self.engine.clone(),
                ExportSettings::default(),
                CollisionPolicy::Overwrite,
            ),
        }
    }

    pub fn pipeline(&self, plan: &ProductionPlan) -> AppResult<ProductionPipeline> {
        let tts = self.tts_client(&plan.tts_api_configuration)?;
        let assembler = self.assembler(&plan.merge_configuration);
        Ok(ProductionPipeline::new(Arc::new(tts), Arc::new(assembler))
            .with_concurrency(self.config.tts_concurrency))
    }

    pub fn run_context(&self) -> RunContext {
        RunContext::new(
            self.config.output_dir.clone(),
            self.config.segments_dir.clone(),
        )
    }
}
