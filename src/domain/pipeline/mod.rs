pub mod context;
pub mod orchestrator;
pub mod report;

pub use context::RunContext;
pub use orchestrator::{ProductionPipeline, PART_CROSSFADE};
pub use report::{PartReport, PartStatus, PipelineFailure, RunReport, RunState};
