//! Form key handler
//!
//! Maps key bindings onto form operations when no prompt is open.

use super::{HandlerAction, KeyAction};
use crate::state::State;
use crate::Result;
use log::{debug, trace};
use std::collections::HashMap;

/// Base handler for the form's key bindings
pub struct FormKeyHandler {
    /// Key bindings map
    keymap: HashMap<Vec<u8>, KeyAction>,
}

impl FormKeyHandler {
    /// Create a new form key handler
    pub fn new(keymap: HashMap<Vec<u8>, KeyAction>) -> Self {
        debug!("Creating form key handler with {} bindings", keymap.len());
        Self { keymap }
    }

    /// Process a key with the form's bindings
    pub fn process_key(&mut self, key: &[u8], state: &mut State) -> Result<HandlerAction> {
        let action = match self.keymap.get(key) {
            Some(action) => *action,
            None => {
                trace!("Unbound key {:?}", key);
                return Ok(HandlerAction::Ignored);
            }
        };

        debug!("Key action {:?} (focus {:?})", action, state.focus);
        match action {
            KeyAction::FocusNext => state.focus_next(),
            KeyAction::FocusPrev => state.focus_prev(),
            KeyAction::Increase => state.adjust(1),
            KeyAction::Decrease => state.adjust(-1),
            KeyAction::Activate => state.activate(),
            KeyAction::Start => state.start(),
            KeyAction::Stop => state.stop(),
            KeyAction::Save => state.prompt_save(),
            KeyAction::EditPath => state.edit_path(),
            KeyAction::Quit => state.quit(),
        }

        Ok(HandlerAction::Handled)
    }
}
