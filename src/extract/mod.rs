//! Text extraction
//!
//! Turns downloaded PDF bytes into one lowercase string. A document that
//! cannot be opened at all is an error; a single unreadable page is not.

pub mod pdf;

pub use pdf::PdfExtractor;

use std::fmt::Display;
use thiserror::Error;

/// Container-level failures. Page-level failures never surface here.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is empty")]
    Empty,

    #[error("not a PDF document: header missing")]
    NotPdf,

    #[error("document too large ({size} bytes, maximum {max})")]
    TooLarge { size: usize, max: usize },

    #[error("malformed PDF document: {0}")]
    Malformed(String),
}

pub trait TextExtractor {
    /// Lowercase text of every readable page, in page order
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Concatenate lowercased page texts, skipping pages that failed.
pub fn collect_pages<I, E>(pages: I) -> String
where
    I: IntoIterator<Item = (u32, Result<String, E>)>,
    E: Display,
{
    let mut text = String::new();
    for (page, result) in pages {
        match result {
            Ok(page_text) => text.push_str(&page_text.to_lowercase()),
            Err(e) => log::warn!("[ERROR EXTRACTING TEXT FROM PAGE {}]: {}", page, e),
        }
    }
    text
}
