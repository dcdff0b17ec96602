use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors turn the leading pages of a PDF into linearized text, one
/// layout line per `\n`. Field extraction over that text lives in
/// `rjmm_parsing::ArticleExtractor`.
pub trait PdfBackend: Send + Sync {
    /// Extract the text of at most `max_pages` leading pages.
    fn extract_pages(&self, pdf: &[u8], max_pages: usize) -> Result<String, BackendError>;
}
