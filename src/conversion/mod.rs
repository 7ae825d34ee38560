//! Conversion of a PDF into speech
//!
//! The controller lives on the UI thread. Each conversion (and each save)
//! runs on a worker thread that reports back through a channel; the UI reads
//! the resulting [`ConversionStatus`] once per refresh tick.

pub mod controller;
pub mod event;
pub mod progress;
pub mod status;
pub mod worker;

pub use controller::Controller;
pub use event::{ConversionEvent, Stage};
pub use status::{ButtonStates, ConversionStatus, Phase};
pub use worker::{run_conversion, run_save, ConversionJob};
