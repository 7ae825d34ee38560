//! Default key bindings for the form

use std::collections::HashMap;

/// Key sequence type
pub type KeySequence = Vec<u8>;

/// Action identifier for key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Focus movement
    FocusNext,
    FocusPrev,

    // Sliders
    Increase,
    Decrease,

    /// Press the focused row
    Activate,

    // Buttons
    Start,
    Stop,
    Save,
    EditPath,

    Quit,
}

/// Create the default keymap
pub fn create_default_keymap() -> HashMap<KeySequence, KeyAction> {
    let mut map = HashMap::new();

    // Focus (tab / shift+tab, up / down)
    map.insert(b"\t".to_vec(), KeyAction::FocusNext);
    map.insert(b"\x1b[Z".to_vec(), KeyAction::FocusPrev);
    map.insert(b"\x1b[A".to_vec(), KeyAction::FocusPrev);
    map.insert(b"\x1b[B".to_vec(), KeyAction::FocusNext);
    map.insert(b"\x1bOA".to_vec(), KeyAction::FocusPrev);
    map.insert(b"\x1bOB".to_vec(), KeyAction::FocusNext);

    // Sliders (left / right)
    map.insert(b"\x1b[C".to_vec(), KeyAction::Increase);
    map.insert(b"\x1b[D".to_vec(), KeyAction::Decrease);
    map.insert(b"\x1bOC".to_vec(), KeyAction::Increase);
    map.insert(b"\x1bOD".to_vec(), KeyAction::Decrease);
    map.insert(b"+".to_vec(), KeyAction::Increase);
    map.insert(b"-".to_vec(), KeyAction::Decrease);

    map.insert(b"\r".to_vec(), KeyAction::Activate);
    map.insert(b"\n".to_vec(), KeyAction::Activate);
    map.insert(b" ".to_vec(), KeyAction::Activate);

    // Buttons (alt+s/x/w/o)
    map.insert(b"\x1bs".to_vec(), KeyAction::Start);
    map.insert(b"\x1bx".to_vec(), KeyAction::Stop);
    map.insert(b"\x1bw".to_vec(), KeyAction::Save);
    map.insert(b"\x1bo".to_vec(), KeyAction::EditPath);

    // Quit (alt+q, ctrl+c)
    map.insert(b"\x1bq".to_vec(), KeyAction::Quit);
    map.insert(b"\x03".to_vec(), KeyAction::Quit);

    map
}
