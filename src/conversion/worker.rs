//! Work done off the UI thread
//!
//! These functions block for as long as extraction and playback take. They
//! never return errors; every outcome is reported through `emit`.

use super::event::{ConversionEvent, Stage};
use crate::cancel::CancellationToken;
use crate::pdf::extract_pages;
use crate::speech::{SharedEngine, SpeechEngine, VoiceSettings};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::MutexGuard;

/// What to convert and how it should sound
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionJob {
    pub path: PathBuf,
    pub settings: VoiceSettings,
}

/// Lock the engine, recovering it if an earlier worker panicked while
/// holding the lock
fn lock_engine(engine: &SharedEngine) -> MutexGuard<'_, Box<dyn SpeechEngine>> {
    engine.lock().unwrap_or_else(|poisoned| {
        warn!("Speech engine lock poisoned by an earlier panic; reusing it");
        poisoned.into_inner()
    })
}

/// Silence the engine and report the stop
fn stopped(engine: &SharedEngine, emit: &mut dyn FnMut(ConversionEvent)) {
    if let Err(e) = lock_engine(engine).stop() {
        warn!("Failed to stop speech engine: {}", e);
    }
    emit(ConversionEvent::Stopped);
}

/// Extract the job's PDF and speak it page by page
///
/// The token is checked before every page in both phases and while each
/// page plays. Cancellation ends the run with `Stopped`, never `Failed`.
pub fn run_conversion(
    job: &ConversionJob,
    engine: &SharedEngine,
    token: &CancellationToken,
    emit: &mut dyn FnMut(ConversionEvent),
) {
    info!("Converting {}", job.path.display());

    if let Err(e) = lock_engine(engine).configure(&job.settings) {
        error!("Failed to configure speech engine: {}", e);
        emit(ConversionEvent::Failed {
            stage: Stage::Synthesis,
            message: e.to_string(),
        });
        return;
    }

    let extraction = match extract_pages(&job.path, token, |progress| {
        emit(ConversionEvent::Extracted {
            page: progress.page,
            total: progress.total,
        })
    }) {
        Ok(extraction) => extraction,
        Err(e) => {
            error!("Extraction failed: {}", e);
            emit(ConversionEvent::Failed {
                stage: Stage::Extraction,
                message: e.to_string(),
            });
            return;
        }
    };

    if !extraction.complete || token.is_cancelled() {
        stopped(engine, emit);
        return;
    }

    let document = extraction.document;
    let total = document.page_count();
    if total == 0 {
        emit(ConversionEvent::Failed {
            stage: Stage::Extraction,
            message: "PDF contains no pages".to_string(),
        });
        return;
    }

    for (index, page_text) in document.pages.iter().enumerate() {
        if token.is_cancelled() {
            stopped(engine, emit);
            return;
        }

        let page = index + 1;
        emit(ConversionEvent::Speaking { page, total });
        debug!("Speaking page {}/{}", page, total);

        // Lock per page so a stop or save never waits on a whole document
        if let Err(e) = lock_engine(engine).speak(page_text, token) {
            error!("Speech failed on page {}: {}", page, e);
            emit(ConversionEvent::Failed {
                stage: Stage::Synthesis,
                message: e.to_string(),
            });
            return;
        }

        if token.is_cancelled() {
            stopped(engine, emit);
            return;
        }
        emit(ConversionEvent::Spoke { page, total });
    }

    emit(ConversionEvent::Completed {
        pages: total,
        text: document.text(),
    });
}

/// Render `text` to an audio file at `path`
pub fn run_save(
    text: &str,
    path: &Path,
    settings: &VoiceSettings,
    engine: &SharedEngine,
    emit: &mut dyn FnMut(ConversionEvent),
) {
    info!("Saving audio to {}", path.display());
    emit(ConversionEvent::Saving {
        path: path.to_path_buf(),
    });

    let result = {
        let mut engine = lock_engine(engine);
        engine
            .configure(settings)
            .and_then(|()| engine.render_to_file(text, path))
    };

    match result {
        Ok(()) => emit(ConversionEvent::Saved {
            path: path.to_path_buf(),
        }),
        Err(e) => {
            error!("Saving audio failed: {}", e);
            emit(ConversionEvent::SaveFailed {
                message: e.to_string(),
            })
        }
    }
}
