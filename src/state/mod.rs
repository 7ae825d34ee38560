//! Application state management
//!
//! The State struct is the form behind the UI: the selected file, the slider
//! values, which row has focus, the modal input handlers, and the conversion
//! controller whose status is shown underneath.

pub mod config;

use crate::conversion::{ButtonStates, Controller};
use crate::input::buffer_handler::BufferHandler;
use crate::input::HandlerStack;
use crate::speech::VoiceSettings;
use crate::Result;
use config::Config;
use log::{debug, info};
use std::path::PathBuf;

/// Words per minute per slider step
pub const RATE_STEP: i32 = 10;

/// Volume fraction per slider step
pub const VOLUME_STEP: f32 = 0.05;

/// Focusable rows of the form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Path,
    Rate,
    Volume,
    Start,
    Stop,
    Save,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Path,
        Field::Rate,
        Field::Volume,
        Field::Start,
        Field::Stop,
        Field::Save,
    ];

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Main application state
pub struct State {
    /// Configuration loaded from ~/.pdf2audio.cfg
    pub config: Config,

    /// Runs conversions and saves
    pub controller: Controller,

    /// Contents of the PDF path entry
    pub pdf_path: String,

    /// Slider values
    pub settings: VoiceSettings,

    /// Row with keyboard focus
    pub focus: Field,

    /// Modal handlers (path entry, save-as prompt)
    pub handlers: HandlerStack,

    /// Set when the user asks to quit
    pub should_quit: bool,
}

impl State {
    /// Create the form, taking slider defaults from the config
    pub fn new(config: Config, controller: Controller, pdf_path: Option<String>) -> Self {
        let settings = config.voice_settings();
        info!(
            "Form initialised: rate {} volume {}",
            settings.rate, settings.volume
        );

        Self {
            config,
            controller,
            pdf_path: pdf_path.unwrap_or_default(),
            settings,
            focus: Field::Path,
            handlers: HandlerStack::new(),
            should_quit: false,
        }
    }

    /// Enabled state of the buttons, from the controller phase
    pub fn buttons(&self) -> ButtonStates {
        self.controller.buttons()
    }

    /// Move focus to the next row, wrapping
    pub fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % Field::ALL.len();
        self.focus = Field::ALL[next];
    }

    /// Move focus to the previous row, wrapping
    pub fn focus_prev(&mut self) {
        let len = Field::ALL.len();
        let prev = (self.focus.index() + len - 1) % len;
        self.focus = Field::ALL[prev];
    }

    /// Move the focused slider by `steps` (negative moves down)
    ///
    /// Does nothing unless a slider has focus.
    pub fn adjust(&mut self, steps: i32) {
        match self.focus {
            Field::Rate => self.settings.adjust_rate(steps * RATE_STEP),
            Field::Volume => self.settings.adjust_volume(steps as f32 * VOLUME_STEP),
            _ => return,
        }
        debug!(
            "Sliders now rate {} volume {}",
            self.settings.rate, self.settings.volume
        );
    }

    /// Activate the focused row (Enter)
    pub fn activate(&mut self) {
        match self.focus {
            Field::Path => self.edit_path(),
            Field::Rate | Field::Volume => {}
            Field::Start => self.start(),
            Field::Stop => self.stop(),
            Field::Save => self.prompt_save(),
        }
    }

    /// Start a conversion if the start button is enabled
    pub fn start(&mut self) {
        if !self.buttons().start {
            return;
        }
        if self.controller.start(&self.pdf_path, self.settings) {
            self.focus = Field::Stop;
        }
    }

    /// Stop the running conversion if the stop button is enabled
    pub fn stop(&mut self) {
        if !self.buttons().stop {
            return;
        }
        self.controller.stop();
        self.focus = Field::Start;
    }

    /// Open the path entry, pre-filled with the current path
    pub fn edit_path(&mut self) {
        let handler = BufferHandler::new(
            "PDF file",
            &self.pdf_path,
            Box::new(|input: String, state: &mut State| {
                state.set_pdf_path(input);
                Ok(())
            }),
        );
        self.handlers.push(Box::new(handler));
    }

    /// Replace the selected PDF path
    pub fn set_pdf_path(&mut self, path: String) {
        let path = path.trim().to_string();
        info!("Selected PDF: {}", path);
        self.pdf_path = path;
    }

    /// Open the save-as prompt if the save button is enabled
    pub fn prompt_save(&mut self) {
        if !self.buttons().save {
            return;
        }
        let suggested = self
            .controller
            .suggested_output_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let handler = BufferHandler::new(
            "Save audio as",
            &suggested,
            Box::new(|input: String, state: &mut State| state.save_to(input)),
        );
        self.handlers.push(Box::new(handler));
    }

    /// Save the converted audio to `path`
    ///
    /// A path without an extension gets the configured default one.
    pub fn save_to(&mut self, path: String) -> Result<()> {
        let path = path.trim();
        if path.is_empty() {
            return Ok(());
        }
        let mut target = PathBuf::from(path);
        if target.extension().is_none() {
            target.set_extension(self.config.default_extension());
        }
        self.controller.save(&target, self.settings);
        Ok(())
    }

    /// Pull worker events into the status; returns true if anything changed
    pub fn tick(&mut self) -> bool {
        self.controller.poll() > 0
    }

    /// Ask the main loop to exit
    pub fn quit(&mut self) {
        info!("Quit requested");
        self.should_quit = true;
    }
}
