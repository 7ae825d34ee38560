//! Input handling and key bindings
//!
//! The input system uses a stack-based handler architecture: text entry
//! prompts are pushed on top of the form handler and pop themselves when
//! the user accepts or cancels.

pub mod buffer_handler;
pub mod default_handler;
pub mod handler;
pub mod keymap;

pub use buffer_handler::BufferHandler;
pub use default_handler::FormKeyHandler;
pub use handler::{HandlerAction, HandlerStack, KeyHandler, Prompt};
pub use keymap::{create_default_keymap, KeyAction};

use crate::state::State;
use crate::Result;

/// Route one read from stdin to the active handler
///
/// The top modal handler gets the key if there is one; otherwise the form's
/// key bindings do.
pub fn dispatch(key: &[u8], state: &mut State, form: &mut FormKeyHandler) -> Result<HandlerAction> {
    // Pop the handler so it can borrow the state mutably
    if let Some(mut handler) = state.handlers.pop() {
        let action = handler.process(key, state)?;
        if action != HandlerAction::Remove {
            state.handlers.push(handler);
        }
        return Ok(action);
    }

    form.process_key(key, state)
}
