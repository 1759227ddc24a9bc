pub mod artifact;
pub mod assembler;
pub mod crossfade;
pub mod error;
pub mod settings;

pub use artifact::AudioArtifact;
pub use assembler::AudioAssembler;
pub use crossfade::{crossfade_from_secs, plan_crossfades, CrossfadePlan, MAX_CROSSFADE};
pub use error::AssemblyError;
pub use settings::{ExportSettings, LoudnessTarget, RenderJob};
