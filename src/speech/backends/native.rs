//! Native TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux
//! - AVFoundation on macOS
//! - WinRT / SAPI on Windows
//!
//! The tts crate has no file output, so saving goes through espeak-ng.

use crate::cancel::CancellationToken;
use crate::speech::engine::{SpeechEngine, POLL_INTERVAL};
use crate::speech::render::FileRenderer;
use crate::speech::settings::{DEFAULT_RATE, MAX_RATE, MIN_RATE};
use crate::speech::VoiceSettings;
use crate::{Pdf2AudioError, Result};
use log::{debug, error, warn};
use std::path::Path;
use std::time::{Duration, Instant};
use tts::{Features, Tts};

/// How long to wait for playback to start before assuming it already ended
const START_GRACE: Duration = Duration::from_millis(500);

/// Map words per minute onto the platform's rate range
///
/// DEFAULT_RATE maps to the platform's normal rate; the slider ends map to
/// the platform minimum and maximum.
pub fn native_rate(rate: u16, min: f32, normal: f32, max: f32) -> f32 {
    let rate = rate.clamp(MIN_RATE, MAX_RATE) as f32;
    let default = DEFAULT_RATE as f32;
    if rate >= default {
        normal + (rate - default) / (MAX_RATE as f32 - default) * (max - normal)
    } else {
        normal - (default - rate) / (default - MIN_RATE as f32) * (normal - min)
    }
}

/// Map a volume fraction onto the platform's volume range
pub fn native_volume(volume: f32, min: f32, max: f32) -> f32 {
    min + volume.clamp(0.0, 1.0) * (max - min)
}

/// Native TTS backend using the tts crate
pub struct NativeEngine {
    tts: Tts,

    features: Features,

    settings: VoiceSettings,

    /// espeak-ng voice used for file rendering
    render_voice: String,

    /// Located on first save
    renderer: Option<FileRenderer>,
}

impl NativeEngine {
    /// Create a new native TTS engine
    ///
    /// Initializes the platform-appropriate TTS backend
    pub fn new(render_voice: &str) -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = Tts::default()
            .map_err(|e| Pdf2AudioError::Speech(format!("Failed to initialize TTS: {}", e)))?;
        let features = tts.supported_features();
        if !features.is_speaking {
            warn!("Platform TTS cannot report playback state; speak() will not wait for playback");
        }

        debug!("Native TTS backend created successfully");

        Ok(Self {
            tts,
            features,
            settings: VoiceSettings::default(),
            render_voice: render_voice.to_string(),
            renderer: None,
        })
    }

    /// Wait for the current utterance to finish or the token to be cancelled
    fn wait_until_done(&mut self, token: &CancellationToken) -> Result<()> {
        let started_at = Instant::now();
        let mut started = false;

        loop {
            if token.is_cancelled() {
                debug!("Playback cancelled");
                return self.stop();
            }

            let speaking = self
                .tts
                .is_speaking()
                .map_err(|e| Pdf2AudioError::Speech(format!("Failed to query playback: {}", e)))?;

            if speaking {
                started = true;
            } else if started || started_at.elapsed() > START_GRACE {
                return Ok(());
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl SpeechEngine for NativeEngine {
    fn name(&self) -> &str {
        "native"
    }

    fn configure(&mut self, settings: &VoiceSettings) -> Result<()> {
        debug!(
            "Configuring native TTS: rate {} volume {}",
            settings.rate, settings.volume
        );
        self.settings = *settings;

        if self.features.rate {
            let rate = native_rate(
                settings.rate,
                self.tts.min_rate(),
                self.tts.normal_rate(),
                self.tts.max_rate(),
            );
            self.tts
                .set_rate(rate)
                .map_err(|e| Pdf2AudioError::Speech(format!("Failed to set rate: {}", e)))?;
        } else {
            warn!("Rate control not supported on this platform");
        }

        if self.features.volume {
            let volume = native_volume(
                settings.volume,
                self.tts.min_volume(),
                self.tts.max_volume(),
            );
            self.tts
                .set_volume(volume)
                .map_err(|e| Pdf2AudioError::Speech(format!("Failed to set volume: {}", e)))?;
        } else {
            warn!("Volume control not supported on this platform");
        }

        Ok(())
    }

    fn speak(&mut self, text: &str, token: &CancellationToken) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        debug!("Speaking {} chars", text.len());
        self.tts.speak(text, false).map_err(|e| {
            error!("Failed to speak: {}", e);
            Pdf2AudioError::Speech(format!("Speak failed: {}", e))
        })?;

        if self.features.is_speaking {
            self.wait_until_done(token)
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        if !self.features.stop {
            warn!("Stopping speech not supported on this platform");
            return Ok(());
        }

        debug!("Stopping speech");
        self.tts.stop().map_err(|e| {
            error!("Failed to stop speech: {}", e);
            Pdf2AudioError::Speech(format!("Stop failed: {}", e))
        })?;

        Ok(())
    }

    fn render_to_file(&mut self, text: &str, path: &Path) -> Result<()> {
        if self.renderer.is_none() {
            self.renderer = Some(FileRenderer::locate(&self.render_voice)?);
        }
        match &self.renderer {
            Some(renderer) => renderer.render(text, &self.settings, path),
            None => Err(Pdf2AudioError::Speech(
                "no file renderer available".to_string(),
            )),
        }
    }
}
