//! espeak-ng backend
//!
//! Runs one espeak-ng process per utterance and waits for it to exit, which
//! gives a true blocking `speak`. On WSL with WSLg the PulseAudio server is
//! detected automatically.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)

use crate::cancel::CancellationToken;
use crate::platform::is_wsl;
use crate::speech::engine::{SpeechEngine, POLL_INTERVAL};
use crate::speech::render::{find_espeak, FileRenderer};
use crate::speech::VoiceSettings;
use crate::{Pdf2AudioError, Result};
use log::{debug, error, info, warn};
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// espeak-ng accepts speeds in this range (words per minute)
const ESPEAK_MIN_SPEED: u16 = 80;
const ESPEAK_MAX_SPEED: u16 = 450;

/// Convert a rate in words per minute to an espeak-ng speed
///
/// Rates below espeak's minimum are raised to it.
pub fn espeak_speed(rate: u16) -> u16 {
    rate.clamp(ESPEAK_MIN_SPEED, ESPEAK_MAX_SPEED)
}

/// Convert a volume fraction (0.0-1.0) to espeak amplitude (0-200)
pub fn espeak_amplitude(volume: f32) -> u16 {
    (volume.clamp(0.0, 1.0) * 200.0).round() as u16
}

/// espeak-ng speech engine
pub struct EspeakEngine {
    /// Path to espeak-ng
    program: String,

    /// Voice name passed with -v
    voice: String,

    /// Settings from the last `configure`
    settings: VoiceSettings,

    /// Currently running espeak-ng process
    current_process: Option<Child>,

    renderer: FileRenderer,
}

impl EspeakEngine {
    /// Create a new espeak-ng engine
    ///
    /// Verifies espeak-ng is installed.
    pub fn new(voice: &str) -> Result<Self> {
        debug!("Creating espeak-ng backend");
        Self::setup_pulseaudio()?;

        let program = find_espeak()?;
        debug!("Found espeak-ng at: {}", program);

        Ok(Self {
            renderer: FileRenderer::new(program.clone(), voice),
            program,
            voice: voice.to_string(),
            settings: VoiceSettings::default(),
            current_process: None,
        })
    }

    /// Point PulseAudio clients at the WSLg server when needed
    fn setup_pulseaudio() -> Result<()> {
        const WSLG_PULSE_PATH: &str = "/mnt/wslg/PulseServer";

        if !is_wsl() || std::env::var("PULSE_SERVER").is_ok() {
            return Ok(());
        }

        if Path::new(WSLG_PULSE_PATH).exists() {
            info!("Auto-detected WSLG PulseAudio server at {}", WSLG_PULSE_PATH);
            std::env::set_var("PULSE_SERVER", WSLG_PULSE_PATH);
            return Ok(());
        }

        warn!("WSLG PulseAudio server not found at {}", WSLG_PULSE_PATH);
        Err(Pdf2AudioError::Speech(
            "PulseAudio server not found. Install WSLg or set PULSE_SERVER environment variable."
                .to_string(),
        ))
    }

    /// Kill the running espeak-ng process, if any
    fn cancel_process(&mut self) {
        if let Some(mut child) = self.current_process.take() {
            debug!("Killing espeak-ng process");
            match child.kill() {
                Ok(_) => {
                    let _ = child.wait(); // reap
                }
                Err(e) => {
                    debug!("Failed to kill espeak-ng process: {}", e);
                }
            }
        }
    }

    fn spawn(&mut self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(espeak_speed(self.settings.rate).to_string())
            .arg("-a")
            .arg(espeak_amplitude(self.settings.volume).to_string())
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn espeak-ng: {}", e);
                Pdf2AudioError::Speech(format!("Failed to start espeak-ng: {}", e))
            })?;

        let stdin = child.stdin.take();
        self.current_process = Some(child);
        if let Some(mut stdin) = stdin {
            // Dropping stdin after the write sends EOF
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                self.cancel_process();
                return Err(Pdf2AudioError::Speech(format!(
                    "Failed to send text to espeak-ng: {}",
                    e
                )));
            }
        }
        Ok(())
    }
}

impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &str {
        "espeak-ng"
    }

    fn configure(&mut self, settings: &VoiceSettings) -> Result<()> {
        debug!(
            "Configuring espeak-ng: rate {} volume {}",
            settings.rate, settings.volume
        );
        self.settings = *settings;
        Ok(())
    }

    fn speak(&mut self, text: &str, token: &CancellationToken) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        self.cancel_process();
        self.spawn(text)?;

        loop {
            if token.is_cancelled() {
                debug!("Playback cancelled");
                self.cancel_process();
                return Ok(());
            }

            let status = match self.current_process.as_mut() {
                Some(child) => child.try_wait()?,
                None => return Ok(()),
            };

            match status {
                Some(status) if status.success() => {
                    self.current_process = None;
                    return Ok(());
                }
                Some(status) => {
                    self.current_process = None;
                    return Err(Pdf2AudioError::Speech(format!(
                        "espeak-ng exited with {}",
                        status
                    )));
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        debug!("Stopping speech");
        self.cancel_process();
        Ok(())
    }

    fn render_to_file(&mut self, text: &str, path: &Path) -> Result<()> {
        self.cancel_process();
        self.renderer.render(text, &self.settings, path)
    }
}

impl Drop for EspeakEngine {
    fn drop(&mut self) {
        debug!("Shutting down espeak-ng backend");
        self.cancel_process();
    }
}
