//! Terminal setup and drawing

pub mod render;
pub mod util;

pub use render::render_form;
pub use util::{get_terminal_size, restore_termios, set_raw_mode, TermiosGuard};
