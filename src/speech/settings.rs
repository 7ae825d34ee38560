//! Voice settings chosen with the rate and volume sliders

/// Slowest selectable speaking rate, in words per minute
pub const MIN_RATE: u16 = 50;

/// Fastest selectable speaking rate, in words per minute
pub const MAX_RATE: u16 = 300;

/// Rate used when nothing else is configured
pub const DEFAULT_RATE: u16 = 150;

/// Volume used when nothing else is configured
pub const DEFAULT_VOLUME: f32 = 0.9;

/// Rate and volume copied into the engine before each conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    /// Words per minute, always within MIN_RATE..=MAX_RATE
    pub rate: u16,

    /// Fraction of full volume, always within 0.0..=1.0
    pub volume: f32,
}

impl VoiceSettings {
    /// Build settings, clamping both values into range
    pub fn new(rate: u16, volume: f32) -> Self {
        Self {
            rate: rate.clamp(MIN_RATE, MAX_RATE),
            volume: clamp_volume(volume),
        }
    }

    /// Move the rate by `delta` words per minute, staying in range
    pub fn adjust_rate(&mut self, delta: i32) {
        let rate = (self.rate as i32 + delta).clamp(MIN_RATE as i32, MAX_RATE as i32);
        self.rate = rate as u16;
    }

    /// Move the volume by `delta`, staying in range
    ///
    /// The result is rounded to two decimals so repeated slider steps
    /// don't accumulate float noise.
    pub fn adjust_volume(&mut self, delta: f32) {
        let volume = clamp_volume(self.volume + delta);
        self.volume = (volume * 100.0).round() / 100.0;
    }

    /// Volume as a whole percentage, for display
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            volume: DEFAULT_VOLUME,
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return DEFAULT_VOLUME;
    }
    volume.clamp(0.0, 1.0)
}
