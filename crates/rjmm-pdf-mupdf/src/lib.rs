use mupdf::{Document, TextPageFlags};

use rjmm_core::text_utils::expand_ligatures;
use rjmm_core::{BackendError, PdfBackend};

const PDF_MAGIC: &str = "application/pdf";

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that text-only code paths do not transitively
/// depend on it.
///
/// Unlike body-text extraction, the running header and footer are kept:
/// several journal layouts carry the issue designation in the header line.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

fn extraction_error(e: mupdf::Error) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl PdfBackend for MupdfBackend {
    fn extract_pages(&self, pdf: &[u8], max_pages: usize) -> Result<String, BackendError> {
        let document = Document::from_bytes(pdf, PDF_MAGIC)
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();
        for page_result in document.pages().map_err(extraction_error)?.take(max_pages) {
            let page = page_result.map_err(extraction_error)?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(extraction_error)?;

            // Block/line iteration keeps one layout line per output line
            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&expand_ligatures(&line_text));
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(pages = pages_text.len(), bytes = pdf.len(), "pdf text extracted");
        Ok(pages_text.join("\n"))
    }
}
