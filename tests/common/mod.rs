//! Shared fixtures for integration tests
//!
//! Builds small text PDFs with lopdf and provides a speech engine that
//! records what it was asked to do instead of making sound.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use pdf2audio::speech::{SharedEngine, SpeechEngine, VoiceSettings};
use pdf2audio::{CancellationToken, Pdf2AudioError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Write a PDF at `path` with one page per entry of `pages`
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path).expect("save test pdf");
}

/// Write a PDF into `dir` and return its path
pub fn pdf_in(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    let path = dir.join(name);
    write_pdf(&path, pages);
    path
}

/// Calls made on a [`FakeEngine`]
#[derive(Debug, Default)]
pub struct Calls {
    pub configured: Vec<VoiceSettings>,
    pub spoken: Vec<String>,
    pub rendered: Vec<PathBuf>,
    pub stops: usize,
}

/// Speech engine that records calls instead of speaking
pub struct FakeEngine {
    pub calls: Arc<Mutex<Calls>>,

    /// 1-based page whose speak() fails
    pub fail_on_page: Option<usize>,

    /// Time each speak() takes, to give cancellation a window
    pub speak_delay: Duration,

    pub fail_render: bool,

    pub panic_on_speak: bool,

    pub panic_on_render: bool,
}

impl FakeEngine {
    pub fn new() -> (Self, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        (
            Self {
                calls: calls.clone(),
                fail_on_page: None,
                speak_delay: Duration::ZERO,
                fail_render: false,
                panic_on_speak: false,
                panic_on_render: false,
            },
            calls,
        )
    }

    pub fn shared(self) -> SharedEngine {
        pdf2audio::speech::share(Box::new(self))
    }
}

impl SpeechEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn configure(&mut self, settings: &VoiceSettings) -> Result<()> {
        self.calls.lock().unwrap().configured.push(*settings);
        Ok(())
    }

    fn speak(&mut self, text: &str, token: &CancellationToken) -> Result<()> {
        let page = {
            let mut calls = self.calls.lock().unwrap();
            calls.spoken.push(text.to_string());
            calls.spoken.len()
        };
        if self.panic_on_speak {
            panic!("speech backend crashed on page {}", page);
        }
        if self.fail_on_page == Some(page) {
            return Err(Pdf2AudioError::Speech("synthesizer crashed".to_string()));
        }

        let step = Duration::from_millis(5);
        let mut waited = Duration::ZERO;
        while waited < self.speak_delay && !token.is_cancelled() {
            std::thread::sleep(step);
            waited += step;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.calls.lock().unwrap().stops += 1;
        Ok(())
    }

    fn render_to_file(&mut self, text: &str, path: &Path) -> Result<()> {
        if self.panic_on_render {
            panic!("renderer crashed");
        }
        if self.fail_render {
            return Err(Pdf2AudioError::Encode("ffmpeg not found".to_string()));
        }
        std::fs::write(path, text)?;
        self.calls.lock().unwrap().rendered.push(path.to_path_buf());
        Ok(())
    }
}
