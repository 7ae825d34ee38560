//! Speech synthesis system

pub mod backends;
pub mod engine;
pub mod render;
pub mod settings;

pub use engine::{create_engine, share, BackendChoice, EngineOptions, SharedEngine, SpeechEngine};
pub use render::FileRenderer;
pub use settings::VoiceSettings;
