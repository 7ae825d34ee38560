//! Speech backends

// Native TTS backend using the tts crate (cross-platform)
pub mod native;

// espeak-ng subprocess backend, also used for file rendering
pub mod espeak;
