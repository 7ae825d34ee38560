//! Key handler system with modal input support

use crate::state::State;
use crate::Result;

/// Action to take after processing a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    /// Key was handled, keep the handler
    Handled,
    /// Remove this handler from the stack
    Remove,
    /// Key means nothing here
    Ignored,
}

/// Text entry shown at the bottom of the form while a prompt is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt<'a> {
    pub label: &'a str,
    pub text: &'a str,
}

/// A key handler processes keyboard input
pub trait KeyHandler {
    /// Process a key sequence
    fn process(&mut self, key: &[u8], state: &mut State) -> Result<HandlerAction>;

    /// Prompt to draw while this handler is active
    fn prompt(&self) -> Option<Prompt<'_>> {
        None
    }
}

/// Stack of key handlers (last one processes input first)
pub struct HandlerStack {
    handlers: Vec<Box<dyn KeyHandler>>,
}

impl HandlerStack {
    /// Create a new handler stack
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Push a handler onto the stack
    pub fn push(&mut self, handler: Box<dyn KeyHandler>) {
        self.handlers.push(handler);
    }

    /// Pop the top handler from the stack
    pub fn pop(&mut self) -> Option<Box<dyn KeyHandler>> {
        self.handlers.pop()
    }

    /// Prompt of the top handler, if it has one
    pub fn prompt(&self) -> Option<Prompt<'_>> {
        self.handlers.last().and_then(|h| h.prompt())
    }

    /// Get the number of handlers in the stack
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerStack {
    fn default() -> Self {
        Self::new()
    }
}
