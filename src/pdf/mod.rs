//! PDF text extraction
//!
//! Pulls the text of each page in order so the conversion can speak it one
//! page at a time.

pub mod extract;
pub mod text;

pub use extract::{extract_pages, Document, Extraction, PageProgress};
pub use text::normalize_page_text;
