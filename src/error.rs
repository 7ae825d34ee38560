//! Error types for pdf2audio

use std::io;
use thiserror::Error;

/// Main error type for pdf2audio
#[derive(Error, Debug)]
pub enum Pdf2AudioError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Audio encoding error: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for pdf2audio operations
pub type Result<T> = std::result::Result<T, Pdf2AudioError>;

impl From<String> for Pdf2AudioError {
    fn from(s: String) -> Self {
        Pdf2AudioError::Other(s)
    }
}

impl From<&str> for Pdf2AudioError {
    fn from(s: &str) -> Self {
        Pdf2AudioError::Other(s.to_string())
    }
}

impl From<lopdf::Error> for Pdf2AudioError {
    fn from(e: lopdf::Error) -> Self {
        Pdf2AudioError::Pdf(e.to_string())
    }
}
