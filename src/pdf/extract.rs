//! Page-by-page text extraction using lopdf

use crate::cancel::CancellationToken;
use crate::pdf::text::normalize_page_text;
use crate::{Pdf2AudioError, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Text of a PDF, one entry per page in page order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Where the text came from
    pub path: PathBuf,

    /// Normalised page texts; empty strings for pages without text
    pub pages: Vec<String>,
}

impl Document {
    /// Number of pages extracted
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whole document as one string, pages separated by newlines
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }
}

/// Result of an extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Pages read before finishing or being cancelled
    pub document: Document,

    /// Page count reported by the PDF
    pub total_pages: usize,

    /// False when the token was cancelled before every page was read
    pub complete: bool,
}

/// Progress report sent after each page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// 1-based number of the page just read
    pub page: usize,

    /// Total pages in the document
    pub total: usize,
}

/// Extract the text of every page of the PDF at `path`
///
/// The token is checked before each page. On cancellation the pages read so
/// far are returned with `complete == false`. `on_page` is called after each
/// page is read.
pub fn extract_pages<F>(path: &Path, token: &CancellationToken, mut on_page: F) -> Result<Extraction>
where
    F: FnMut(PageProgress),
{
    if !path.exists() {
        return Err(Pdf2AudioError::Pdf(format!(
            "No such file: {}",
            path.display()
        )));
    }

    info!("Loading PDF {}", path.display());
    let pdf = lopdf::Document::load(path)
        .map_err(|e| Pdf2AudioError::Pdf(format!("Failed to open {}: {}", path.display(), e)))?;

    // BTreeMap keyed by page number, so iteration is in reading order
    let page_numbers: Vec<u32> = pdf.get_pages().keys().copied().collect();
    let total = page_numbers.len();
    info!("PDF has {} pages", total);

    let mut pages = Vec::with_capacity(total);
    for (index, page_number) in page_numbers.into_iter().enumerate() {
        if token.is_cancelled() {
            info!("Extraction cancelled after {} of {} pages", index, total);
            return Ok(Extraction {
                document: Document {
                    path: path.to_path_buf(),
                    pages,
                },
                total_pages: total,
                complete: false,
            });
        }

        let text = match pdf.extract_text(&[page_number]) {
            Ok(raw) => normalize_page_text(&raw),
            Err(e) => {
                // Scanned pages and exotic fonts fail here; keep the page slot
                warn!("No text extracted from page {}: {}", page_number, e);
                String::new()
            }
        };
        debug!("Page {}: {} chars", page_number, text.len());
        pages.push(text);

        on_page(PageProgress {
            page: index + 1,
            total,
        });
    }

    Ok(Extraction {
        document: Document {
            path: path.to_path_buf(),
            pages,
        },
        total_pages: total,
        complete: true,
    })
}
