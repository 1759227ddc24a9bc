pub mod client;
pub mod error;
pub mod model;
pub mod retry;
pub mod voice;

pub use client::{new_synthesis_cache, SynthesisCache, TtsClient};
pub use error::{AttemptFailure, TtsError};
pub use model::{EndpointRole, SynthesisRequest, SynthesizedAudio};
pub use retry::{RetryPolicy, RetryState};
