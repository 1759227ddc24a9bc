pub mod audio;
pub mod pipeline;
pub mod plan;
pub mod shared;
pub mod tts;
