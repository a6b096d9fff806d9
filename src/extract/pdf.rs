//! lopdf-backed extractor
//!
//! The PDF library can panic on hostile input. Each call into it is
//! wrapped so a panic is reported like any other failure instead of
//! taking the scan down.

use super::{collect_pages, ExtractError, TextExtractor};
use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};

/// PDF magic bytes
const PDF_MAGIC: &[u8] = b"%PDF";
/// Maximum PDF size (100 MB)
pub const MAX_PDF_SIZE: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct PdfExtractor {
    max_size: usize,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            max_size: MAX_PDF_SIZE,
        }
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self { max_size }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap checks before handing bytes to the parser
fn validate_pdf(bytes: &[u8], max_size: usize) -> Result<(), ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::Empty);
    }

    if bytes.len() > max_size {
        return Err(ExtractError::TooLarge {
            size: bytes.len(),
            max: max_size,
        });
    }

    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ExtractError::NotPdf);
    }

    Ok(())
}

fn load_document(bytes: &[u8]) -> Result<Document, ExtractError> {
    match panic::catch_unwind(|| Document::load_mem(bytes)) {
        Ok(Ok(doc)) => Ok(doc),
        Ok(Err(e)) => Err(ExtractError::Malformed(e.to_string())),
        Err(_) => Err(ExtractError::Malformed("parser panicked".to_string())),
    }
}

fn extract_page(doc: &Document, page: u32) -> Result<String, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page]))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("text extraction panicked".to_string()),
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        validate_pdf(bytes, self.max_size)?;
        let doc = load_document(bytes)?;

        // get_pages is keyed by page number, so this walks in document order
        let pages = doc.get_pages();
        log::debug!("Extracting text from {} pages", pages.len());

        Ok(collect_pages(
            pages.keys().map(|&number| (number, extract_page(&doc, number))),
        ))
    }
}
