//! Configuration management

use crate::speech::{BackendChoice, EngineOptions, VoiceSettings};
use crate::speech::settings::{DEFAULT_RATE, DEFAULT_VOLUME};
use crate::{Pdf2AudioError, Result};
use ini::Ini;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Application defaults loaded from ~/.pdf2audio.cfg
///
/// Only startup values live here. Slider changes made in the form are not
/// written back.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, creating a default file if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(path)
                .map_err(|e| Pdf2AudioError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            if let Err(e) = default.write_to_file(path) {
                // A read-only home shouldn't keep the program from starting
                warn!("Failed to write default config to {:?}: {}", path, e);
            }
            default
        };

        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// Configuration with built-in defaults, not backed by a file
    pub fn defaults() -> Self {
        Self {
            ini: Self::default_config(),
            path: Self::config_path(),
        }
    }

    /// Default config file path (~/.pdf2audio.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pdf2audio.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("voice"))
            .set("rate", DEFAULT_RATE.to_string())
            .set("volume", DEFAULT_VOLUME.to_string());

        ini.with_section(Some("engine"))
            .set("backend", "auto")
            .set("espeak_voice", "en");

        ini.with_section(Some("output"))
            .set("default_extension", "mp3");

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Initial slider values, clamped into range
    pub fn voice_settings(&self) -> VoiceSettings {
        let rate = self
            .get_int("voice", "rate", DEFAULT_RATE as i32)
            .clamp(0, u16::MAX as i32) as u16;
        let volume = self.get_float("voice", "volume", DEFAULT_VOLUME);
        VoiceSettings::new(rate, volume)
    }

    /// Speech backend selection
    ///
    /// An unknown backend name falls back to `auto` with a warning.
    pub fn engine_options(&self) -> EngineOptions {
        let raw = self.get_string("engine", "backend", "auto");
        let backend = raw.parse().unwrap_or_else(|e| {
            warn!("{}", e);
            BackendChoice::Auto
        });
        EngineOptions {
            backend,
            espeak_voice: self.get_string("engine", "espeak_voice", "en"),
        }
    }

    /// Extension suggested for saved audio, without the dot
    pub fn default_extension(&self) -> String {
        let ext = self.get_string("output", "default_extension", "mp3");
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() {
            "mp3".to_string()
        } else {
            ext.to_string()
        }
    }
}
