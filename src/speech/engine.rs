//! Speech engine abstraction
//!
//! A conversion drives one engine session: configure it with the current
//! slider values, speak each page in turn, and optionally render the whole
//! text to a file afterwards.

use crate::cancel::CancellationToken;
use crate::platform::is_wsl;
use crate::speech::VoiceSettings;
use crate::{Pdf2AudioError, Result};
use log::info;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How often blocking calls check for completion and cancellation
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Speech engine session
///
/// Implementations keep their own state (rate, volume, running process)
/// between calls. `configure` is called before every conversion and save.
pub trait SpeechEngine: Send {
    /// Short backend name for logs and the status line
    fn name(&self) -> &str;

    /// Apply rate and volume for subsequent calls
    fn configure(&mut self, settings: &VoiceSettings) -> Result<()>;

    /// Speak `text` and block until playback finishes
    ///
    /// Returns early, with playback halted, once `token` is cancelled.
    fn speak(&mut self, text: &str, token: &CancellationToken) -> Result<()>;

    /// Halt any playback in progress
    fn stop(&mut self) -> Result<()>;

    /// Synthesize `text` into an audio file at `path`, blocking until written
    fn render_to_file(&mut self, text: &str, path: &Path) -> Result<()>;
}

/// Engine shared between the UI thread and conversion workers
pub type SharedEngine = Arc<Mutex<Box<dyn SpeechEngine>>>;

/// Wrap an engine for sharing with worker threads
pub fn share(engine: Box<dyn SpeechEngine>) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// Which backend to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Try every backend, best first
    Auto,
    /// Platform speech service through the tts crate
    Native,
    /// espeak-ng subprocess
    Espeak,
}

impl FromStr for BackendChoice {
    type Err = Pdf2AudioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(BackendChoice::Auto),
            "native" | "tts" => Ok(BackendChoice::Native),
            "espeak" | "espeak-ng" => Ok(BackendChoice::Espeak),
            other => Err(Pdf2AudioError::Config(format!(
                "unknown speech backend '{}' (expected auto, native or espeak)",
                other
            ))),
        }
    }
}

/// Options for [`create_engine`], read from the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub backend: BackendChoice,

    /// espeak-ng voice name, also used when rendering files
    pub espeak_voice: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            backend: BackendChoice::Auto,
            espeak_voice: "en".to_string(),
        }
    }
}

/// Order in which `auto` tries backends
///
/// Speech Dispatcher is rarely running under WSL, so espeak-ng goes first there.
pub fn backend_order(choice: BackendChoice, wsl: bool) -> Vec<BackendChoice> {
    match choice {
        BackendChoice::Native => vec![BackendChoice::Native],
        BackendChoice::Espeak => vec![BackendChoice::Espeak],
        BackendChoice::Auto if wsl => vec![BackendChoice::Espeak, BackendChoice::Native],
        BackendChoice::Auto => vec![BackendChoice::Native, BackendChoice::Espeak],
    }
}

/// Create a speech engine according to `options`
///
/// Every backend that fails to initialise is reported in the final error.
pub fn create_engine(options: &EngineOptions) -> Result<Box<dyn SpeechEngine>> {
    use super::backends::espeak::EspeakEngine;
    use super::backends::native::NativeEngine;

    let mut failures = Vec::new();
    for backend in backend_order(options.backend, is_wsl()) {
        let attempt: Result<Box<dyn SpeechEngine>> = match backend {
            BackendChoice::Native => {
                NativeEngine::new(&options.espeak_voice).map(|e| Box::new(e) as Box<dyn SpeechEngine>)
            }
            BackendChoice::Espeak => {
                EspeakEngine::new(&options.espeak_voice).map(|e| Box::new(e) as Box<dyn SpeechEngine>)
            }
            BackendChoice::Auto => continue,
        };

        match attempt {
            Ok(engine) => {
                info!("Using {} speech backend", engine.name());
                return Ok(engine);
            }
            Err(e) => {
                info!("{:?} speech backend unavailable: {}", backend, e);
                failures.push(format!("{:?}: {}", backend, e));
            }
        }
    }

    Err(Pdf2AudioError::Speech(format!(
        "No speech backend available. Tried:\n  {}\n\
         Install speech-dispatcher or espeak-ng (sudo apt install espeak-ng)",
        failures.join("\n  ")
    )))
}
