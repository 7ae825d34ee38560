//! pdf2audio - PDF audiobook converter
//!
//! Extracts the text of a PDF page by page and reads it aloud through a
//! text-to-speech engine, optionally saving the result as an audio file.

pub mod cancel;
pub mod conversion;
pub mod error;
pub mod input;
pub mod pdf;
pub mod platform;
pub mod speech;
pub mod state;
pub mod terminal;

pub use cancel::CancellationToken;
pub use error::{Pdf2AudioError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "pdf2audio";
