pub mod error;
pub mod model;

pub use error::PlanError;
pub use model::{
    AudioNormalization, CollisionPolicy, EndpointKind, MergeConfiguration, Part, PlanMetadata,
    ProductionPlan, QualitySettings, Segment, Transitions, TtsApiConfiguration,
};
