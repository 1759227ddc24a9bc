// End-to-end tests for the songtape audio production API
//
// Each test gets its own server on an ephemeral port, a temp directory for
// the plan and generated audio, and a local fake TTS service. Audio merging
// runs through a byte-concatenating engine so results can be checked by
// content; test_ffmpeg exercises the real ffmpeg engine when it is installed.

mod test_ffmpeg;
mod test_health;
mod test_merge;
mod test_produce;
