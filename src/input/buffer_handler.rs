//! Buffer handler for collecting text input
//!
//! Used for the PDF path entry and the save-as prompt.

use super::{HandlerAction, KeyHandler, Prompt};
use crate::state::State;
use crate::Result;
use log::debug;

/// Callback function type for when input is complete
pub type OnAcceptFn = Box<dyn FnOnce(String, &mut State) -> Result<()> + Send>;

/// Handler that collects text input until Enter is pressed
///
/// Escape closes the prompt without calling the callback.
pub struct BufferHandler {
    /// Shown before the text
    label: String,

    /// Accumulated input buffer
    buffer: String,

    /// Callback to execute when Enter is pressed
    on_accept: Option<OnAcceptFn>,
}

impl BufferHandler {
    /// Create a new buffer handler pre-filled with `initial`
    pub fn new(label: &str, initial: &str, on_accept: OnAcceptFn) -> Self {
        Self {
            label: label.to_string(),
            buffer: initial.to_string(),
            on_accept: Some(on_accept),
        }
    }
}

impl KeyHandler for BufferHandler {
    fn process(&mut self, key: &[u8], state: &mut State) -> Result<HandlerAction> {
        match key {
            // Enter - accept input and invoke callback
            b"\r" | b"\n" => {
                debug!("BufferHandler: accepting input '{}'", self.buffer);
                if let Some(callback) = self.on_accept.take() {
                    callback(std::mem::take(&mut self.buffer), state)?;
                }
                Ok(HandlerAction::Remove)
            }

            // Escape or ctrl+c - close without accepting
            b"\x1b" | b"\x03" => {
                debug!("BufferHandler: cancelled");
                Ok(HandlerAction::Remove)
            }

            // Backspace - remove last character
            b"\x08" | b"\x7f" => {
                self.buffer.pop();
                Ok(HandlerAction::Handled)
            }

            // ctrl+u - clear the line
            b"\x15" => {
                self.buffer.clear();
                Ok(HandlerAction::Handled)
            }

            // Other escape sequences (arrows etc.) have no meaning here
            _ if key.first() == Some(&0x1b) => Ok(HandlerAction::Ignored),

            // Regular characters, including pasted runs of them
            _ => {
                if let Ok(s) = std::str::from_utf8(key) {
                    let printable: String = s.chars().filter(|c| !c.is_control()).collect();
                    self.buffer.push_str(&printable);
                    debug!("BufferHandler: buffer now '{}'", self.buffer);
                }
                Ok(HandlerAction::Handled)
            }
        }
    }

    fn prompt(&self) -> Option<Prompt<'_>> {
        Some(Prompt {
            label: &self.label,
            text: &self.buffer,
        })
    }
}
