//! Conversion controller
//!
//! Owned by the UI thread. Starts workers, relays stop requests through the
//! cancellation token, and folds worker events into the status shown on
//! screen.

use super::event::{ConversionEvent, Envelope, Stage};
use super::status::{ButtonStates, ConversionStatus, Phase};
use super::worker::{run_conversion, run_save, ConversionJob};
use crate::cancel::CancellationToken;
use crate::speech::{SharedEngine, VoiceSettings};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

/// Drives conversions and saves for the UI
pub struct Controller {
    engine: SharedEngine,

    /// Backend name, read once so drawing never waits on the engine lock
    engine_name: String,

    status: ConversionStatus,

    /// Id of the current run; events tagged with older ids are dropped
    run: u64,

    token: CancellationToken,

    sender: Sender<Envelope>,
    receiver: Receiver<Envelope>,

    worker: Option<JoinHandle<()>>,
    saver: Option<JoinHandle<()>>,

    /// Source of the last started conversion
    source: Option<PathBuf>,

    /// Whole text of the last completed conversion
    text: Option<String>,

    saving: bool,

    /// Extension suggested for saved audio, without the dot
    default_extension: String,
}

impl Controller {
    /// Create a controller around a speech engine session
    pub fn new(engine: SharedEngine) -> Self {
        let (sender, receiver) = mpsc::channel();
        let engine_name = engine
            .lock()
            .map(|engine| engine.name().to_string())
            .unwrap_or_else(|poisoned| poisoned.into_inner().name().to_string());
        Self {
            engine,
            engine_name,
            status: ConversionStatus::default(),
            run: 0,
            token: CancellationToken::new(),
            sender,
            receiver,
            worker: None,
            saver: None,
            source: None,
            text: None,
            saving: false,
            default_extension: "mp3".to_string(),
        }
    }

    /// Use a different extension for suggested output paths
    pub fn with_default_extension(mut self, extension: &str) -> Self {
        self.default_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Current status, as of the last `poll`
    pub fn status(&self) -> &ConversionStatus {
        &self.status
    }

    pub fn phase(&self) -> Phase {
        self.status.phase
    }

    pub fn buttons(&self) -> ButtonStates {
        self.status.phase.buttons()
    }

    /// Is a save running?
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Text of the last completed conversion
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Name of the speech backend, for display
    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    /// Start converting the PDF at `path`
    ///
    /// Returns false, with a status message, when no file is given or a
    /// conversion or save is already running.
    pub fn start(&mut self, path: &str, settings: VoiceSettings) -> bool {
        let path = path.trim();
        if path.is_empty() {
            self.status.set_message("Please select a PDF file first", "");
            return false;
        }
        if self.status.phase.is_active() {
            warn!("Start requested while a conversion is running");
            return false;
        }
        if self.saving {
            self.status
                .set_message("Please wait for the save to finish", "");
            return false;
        }

        // Joins finished threads and settles any that died silently
        self.poll();

        self.run += 1;
        self.token = CancellationToken::new();
        self.text = None;

        let path = PathBuf::from(path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.status.begin(&file_name);
        self.source = Some(path.clone());

        info!(
            "Starting run {} for {} (rate {}, volume {})",
            self.run,
            path.display(),
            settings.rate,
            settings.volume
        );

        let job = ConversionJob { path, settings };
        let engine = self.engine.clone();
        let token = self.token.clone();
        let sender = self.sender.clone();
        let run = self.run;

        if let Some(previous) = self.worker.take() {
            // Cancelled earlier; it exits at its next check and its events are stale
            debug!("Detaching previous worker (finished: {})", previous.is_finished());
        }

        self.worker = Some(std::thread::spawn(move || {
            run_conversion(&job, &engine, &token, &mut |event| {
                // Receiver gone means the UI has shut down
                let _ = sender.send(Envelope { run, event });
            });
        }));
        true
    }

    /// Stop the running conversion
    ///
    /// Playback halts at once; the worker exits at its next page boundary.
    /// If the worker holds the engine it is inside `speak`, which watches
    /// the token itself, and it silences the engine again on its way out.
    pub fn stop(&mut self) {
        if !self.status.phase.is_active() {
            return;
        }
        info!("Stop requested for run {}", self.run);
        self.token.cancel();
        match self.engine.try_lock() {
            Ok(mut engine) => {
                if let Err(e) = engine.stop() {
                    warn!("Failed to stop speech engine: {}", e);
                }
            }
            Err(_) => debug!("Engine busy, leaving the halt to the worker"),
        }
        self.status.apply(&ConversionEvent::Stopped);
    }

    /// Save the last completed conversion as audio at `path`
    pub fn save(&mut self, path: &Path, settings: VoiceSettings) -> bool {
        let text = match (&self.text, self.status.phase) {
            (Some(text), Phase::Completed) if !text.is_empty() => text.clone(),
            _ => {
                self.status.set_message("No audio to save", "");
                return false;
            }
        };
        if self.saving {
            self.status
                .set_message("Saving audio file...", "A save is already in progress");
            return false;
        }

        self.saving = true;
        self.status.set_message("Saving audio file...", "Please wait...");

        let path = path.to_path_buf();
        let engine = self.engine.clone();
        let sender = self.sender.clone();
        let run = self.run;

        self.saver = Some(std::thread::spawn(move || {
            run_save(&text, &path, &settings, &engine, &mut |event| {
                let _ = sender.send(Envelope { run, event });
            });
        }));
        true
    }

    /// Suggested output path: the source PDF with the default audio extension
    pub fn suggested_output_path(&self) -> Option<PathBuf> {
        self.source
            .as_ref()
            .map(|source| source.with_extension(&self.default_extension))
    }

    /// Apply every pending worker event; returns how many changed the status
    ///
    /// A worker that exited without reporting an outcome (it panicked) is
    /// turned into a failure so the form never stays busy.
    pub fn poll(&mut self) -> usize {
        // Checked before draining: a finished thread has sent everything
        let worker_done = self.worker.as_ref().map_or(false, |h| h.is_finished());
        let saver_done = self.saver.as_ref().map_or(false, |h| h.is_finished());

        let mut applied = self.drain();
        if worker_done {
            if let Some(worker) = self.worker.take() {
                let panicked = worker.join().is_err();
                applied += usize::from(self.worker_exited(panicked));
            }
        }
        if saver_done {
            if let Some(saver) = self.saver.take() {
                let panicked = saver.join().is_err();
                applied += usize::from(self.saver_exited(panicked));
            }
        }
        applied
    }

    fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = self.receiver.try_recv() {
            if envelope.run != self.run {
                debug!("Dropping event from stale run {}", envelope.run);
                continue;
            }
            if self.handle(envelope.event) {
                applied += 1;
            }
        }
        applied
    }

    fn handle(&mut self, event: ConversionEvent) -> bool {
        if matches!(
            event,
            ConversionEvent::Saved { .. } | ConversionEvent::SaveFailed { .. }
        ) {
            self.saving = false;
        }

        let applied = self.status.apply(&event);
        if applied {
            if let ConversionEvent::Completed { text, .. } = event {
                self.text = Some(text);
            }
        }
        applied
    }

    /// Block until running workers finish, then apply their events
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            let panicked = worker.join().is_err();
            self.drain();
            self.worker_exited(panicked);
        }
        if let Some(saver) = self.saver.take() {
            let panicked = saver.join().is_err();
            self.drain();
            self.saver_exited(panicked);
        }
        self.drain();
    }

    /// Called once the conversion worker has been joined and drained
    fn worker_exited(&mut self, panicked: bool) -> bool {
        if !self.status.phase.is_active() {
            return false;
        }
        let stage = match self.status.phase {
            Phase::Extracting => Stage::Extraction,
            _ => Stage::Synthesis,
        };
        let message = if panicked {
            "conversion worker panicked"
        } else {
            "conversion worker exited without a result"
        };
        error!("Run {}: {}", self.run, message);
        self.handle(ConversionEvent::Failed {
            stage,
            message: message.to_string(),
        })
    }

    /// Called once the save worker has been joined and drained
    fn saver_exited(&mut self, panicked: bool) -> bool {
        if !self.saving {
            return false;
        }
        let message = if panicked {
            "save worker panicked"
        } else {
            "save worker exited without a result"
        };
        error!("{}", message);
        self.handle(ConversionEvent::SaveFailed {
            message: message.to_string(),
        })
    }

    /// Cancel any run, wait for workers, and silence the engine
    pub fn shutdown(&mut self) {
        info!("Shutting down conversion controller");
        self.token.cancel();
        self.wait();
        let mut engine = self
            .engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = engine.stop() {
            warn!("Failed to stop speech engine: {}", e);
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
