//! Conversion state machine
//!
//! `Idle -> Extracting -> Synthesizing -> Completed`, with `Stopped` and
//! `Error` reachable from either active phase. Any terminal phase can start
//! over.

use super::event::{ConversionEvent, Stage};
use super::progress::{extraction_percent, synthesis_percent};
use log::{debug, info};

/// Where the controller is in a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Extracting,
    Synthesizing,
    Stopped,
    Completed,
    Error,
}

impl Phase {
    /// Is a worker expected to be running?
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Extracting | Phase::Synthesizing)
    }

    /// Which buttons are enabled in this phase
    pub fn buttons(self) -> ButtonStates {
        ButtonStates {
            start: !self.is_active(),
            stop: self.is_active(),
            save: self == Phase::Completed,
        }
    }
}

/// Enabled state of the start / stop / save buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStates {
    pub start: bool,
    pub stop: bool,
    pub save: bool,
}

/// Everything the UI shows about the current conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionStatus {
    pub phase: Phase,

    /// 0-100
    pub progress: u8,

    /// Headline status line
    pub status: String,

    /// Second, more detailed status line
    pub detail: String,

    /// Pages in the current document, once known
    pub pages: usize,
}

impl Default for ConversionStatus {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            progress: 0,
            status: "Ready".to_string(),
            detail: String::new(),
            pages: 0,
        }
    }
}

impl ConversionStatus {
    /// Reset for a new run
    pub fn begin(&mut self, file_name: &str) {
        *self = Self {
            phase: Phase::Extracting,
            progress: 0,
            status: "Extracting text".to_string(),
            detail: format!("Opening {}", file_name),
            pages: 0,
        };
    }

    /// Replace both status lines without touching the phase
    pub fn set_message(&mut self, status: impl Into<String>, detail: impl Into<String>) {
        self.status = status.into();
        self.detail = detail.into();
    }

    /// Apply a worker event
    ///
    /// Returns false when the event no longer fits the phase (for example
    /// progress arriving after the user pressed stop) and was ignored.
    pub fn apply(&mut self, event: &ConversionEvent) -> bool {
        match event {
            ConversionEvent::Extracted { page, total } => {
                if self.phase != Phase::Extracting {
                    return false;
                }
                self.pages = *total;
                self.progress = extraction_percent(*page, *total);
                self.set_message("Extracting text", format!("Page {}/{}", page, total));
            }

            ConversionEvent::Speaking { page, total } => {
                if !self.phase.is_active() {
                    return false;
                }
                if self.phase == Phase::Extracting {
                    info!("Extraction finished, synthesizing {} pages", total);
                    self.progress = extraction_percent(*total, *total);
                }
                self.phase = Phase::Synthesizing;
                self.pages = *total;
                self.set_message(
                    "Converting to speech",
                    format!("Processing page {}/{}", page, total),
                );
            }

            ConversionEvent::Spoke { page, total } => {
                if self.phase != Phase::Synthesizing {
                    return false;
                }
                self.progress = synthesis_percent(*page, *total);
            }

            ConversionEvent::Completed { pages, .. } => {
                if !self.phase.is_active() {
                    return false;
                }
                info!("Conversion completed ({} pages)", pages);
                self.phase = Phase::Completed;
                self.pages = *pages;
                self.progress = 100;
                self.set_message("Conversion completed!", format!("Processed {} pages", pages));
            }

            ConversionEvent::Stopped => {
                if !self.phase.is_active() {
                    return false;
                }
                info!("Conversion stopped");
                self.phase = Phase::Stopped;
                self.set_message("Conversion stopped", "Stopped by user");
            }

            ConversionEvent::Failed { stage, message } => {
                if !self.phase.is_active() {
                    return false;
                }
                info!("Conversion failed during {:?}: {}", stage, message);
                self.phase = Phase::Error;
                match stage {
                    Stage::Extraction => {
                        self.status = format!("Error: {}", message);
                    }
                    Stage::Synthesis => {
                        self.set_message(
                            format!("Error during conversion: {}", message),
                            "An error occurred",
                        );
                    }
                }
            }

            ConversionEvent::Saving { .. } => {
                if self.phase != Phase::Completed {
                    return false;
                }
                self.set_message("Saving audio file...", "Please wait...");
            }

            ConversionEvent::Saved { path } => {
                if self.phase != Phase::Completed {
                    return false;
                }
                self.set_message(
                    "Audio file saved successfully!",
                    format!("Saved to: {}", path.display()),
                );
            }

            ConversionEvent::SaveFailed { message } => {
                if self.phase != Phase::Completed {
                    return false;
                }
                self.set_message(
                    format!("Error saving audio: {}", message),
                    "Failed to save audio file",
                );
            }
        }

        debug!("Status now {:?} {}%", self.phase, self.progress);
        true
    }
}
