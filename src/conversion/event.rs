//! Messages sent from worker threads to the controller

use std::path::PathBuf;

/// Which half of a conversion failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Synthesis,
}

/// Progress and outcome reports from a conversion or save worker
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionEvent {
    /// Page `page` of `total` has been extracted
    Extracted { page: usize, total: usize },

    /// About to speak page `page` of `total`
    Speaking { page: usize, total: usize },

    /// Finished speaking page `page` of `total`
    Spoke { page: usize, total: usize },

    /// Every page was spoken; `text` is the whole document for saving
    Completed { pages: usize, text: String },

    /// The run noticed cancellation and exited early
    Stopped,

    /// The run failed
    Failed { stage: Stage, message: String },

    /// A save to `path` has started
    Saving { path: PathBuf },

    /// The audio file was written
    Saved { path: PathBuf },

    /// The audio file could not be written
    SaveFailed { message: String },
}

/// An event tagged with the run that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub run: u64,
    pub event: ConversionEvent,
}
