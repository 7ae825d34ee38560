//! Render speech to audio files
//!
//! espeak-ng writes WAV; anything else (normally MP3) is transcoded with
//! ffmpeg from a temporary WAV written next to the target.

use crate::platform::find_program;
use crate::speech::backends::espeak::{espeak_amplitude, espeak_speed};
use crate::speech::VoiceSettings;
use crate::{Pdf2AudioError, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const ESPEAK_CANDIDATES: &[&str] = &["espeak-ng", "/usr/bin/espeak-ng", "espeak"];

/// Writes synthesized speech to disk
#[derive(Debug, Clone)]
pub struct FileRenderer {
    /// espeak-ng executable
    espeak: String,

    /// espeak-ng voice name
    voice: String,
}

impl FileRenderer {
    /// Create a renderer using a known espeak-ng executable
    pub fn new(espeak: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            espeak: espeak.into(),
            voice: voice.into(),
        }
    }

    /// Find espeak-ng on this system
    pub fn locate(voice: &str) -> Result<Self> {
        let espeak = find_espeak()?;
        Ok(Self::new(espeak, voice))
    }

    /// Render `text` into `target`
    ///
    /// `.wav` targets are written directly; other extensions go through ffmpeg.
    pub fn render(&self, text: &str, settings: &VoiceSettings, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(Pdf2AudioError::Encode(format!(
                    "Output directory {} does not exist",
                    parent.display()
                )));
            }
        }

        if is_wav(target) {
            info!("Rendering speech to {}", target.display());
            return self.write_wav(text, settings, target);
        }

        let ffmpeg = which::which("ffmpeg").map_err(|e| {
            Pdf2AudioError::Encode(format!(
                "ffmpeg is not available on PATH ({}). Save as .wav or install ffmpeg.",
                e
            ))
        })?;
        debug!("Using ffmpeg at {}", ffmpeg.display());

        let wav = intermediate_wav_path(target);
        info!(
            "Rendering speech to {} via {}",
            target.display(),
            wav.display()
        );
        let result = self
            .write_wav(text, settings, &wav)
            .and_then(|()| transcode(&ffmpeg, &wav, target));

        if let Err(e) = fs::remove_file(&wav) {
            debug!("Could not remove {}: {}", wav.display(), e);
        }
        result
    }

    /// Run espeak-ng with text on stdin, writing a WAV file
    fn write_wav(&self, text: &str, settings: &VoiceSettings, wav: &Path) -> Result<()> {
        let mut child = Command::new(&self.espeak)
            .arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(espeak_speed(settings.rate).to_string())
            .arg("-a")
            .arg(espeak_amplitude(settings.volume).to_string())
            .arg("-w")
            .arg(wav)
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Pdf2AudioError::Speech(format!("Failed to start espeak-ng: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
            // Dropping stdin sends EOF so espeak-ng finishes
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Pdf2AudioError::Speech(format!(
                "espeak-ng exited with {}: {}",
                output.status, stderr
            )));
        }

        if !wav.exists() {
            return Err(Pdf2AudioError::Speech(format!(
                "espeak-ng succeeded but {} was not created",
                wav.display()
            )));
        }
        Ok(())
    }
}

/// Find an espeak-ng executable
pub fn find_espeak() -> Result<String> {
    find_program(ESPEAK_CANDIDATES, "--version").ok_or_else(|| {
        Pdf2AudioError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        )
    })
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Sibling path for the WAV written before transcoding
fn intermediate_wav_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part.wav");
    target.with_file_name(name)
}

fn transcode(ffmpeg: &Path, wav: &Path, target: &Path) -> Result<()> {
    let output = Command::new(ffmpeg)
        .arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(wav)
        .args(["-vn", "-ar", "22050", "-ac", "1"])
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Pdf2AudioError::Encode(format!("Failed to start ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!("ffmpeg failed: {}", stderr);
        return Err(Pdf2AudioError::Encode(format!(
            "ffmpeg exited with {}: {}",
            output.status, stderr
        )));
    }

    if !target.exists() {
        return Err(Pdf2AudioError::Encode(format!(
            "ffmpeg succeeded but {} was not created",
            target.display()
        )));
    }
    Ok(())
}
