use std::path::PathBuf;

use thiserror::Error;

pub mod fetch;
pub mod source;

pub use fetch::{FetchSettings, Fetcher};
pub use source::Source;

// Re-export domain types for convenience
pub use rjmm_core::{ArticleRecord, AuthorLookup, FormatTag};
pub use rjmm_parsing::{ArticleExtractor, ExtractionContext};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF extraction error: {0}")]
    Parsing(#[from] rjmm_parsing::ParsingError),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of rjmm-ingest)")]
    NoPdfSupport,
}

/// Loads sources and runs them through an [`ArticleExtractor`].
///
/// `.txt` paths are read as already-extracted page text; other paths and
/// URLs are PDFs, read through the MuPDF backend (requires the `pdf`
/// feature).
pub struct Ingestor {
    extractor: ArticleExtractor,
    fetcher: Fetcher,
}

impl Ingestor {
    pub fn new(settings: FetchSettings) -> Result<Self, IngestError> {
        Ok(Self {
            extractor: ArticleExtractor::new(),
            fetcher: Fetcher::new(settings)?,
        })
    }

    /// Replace the default extractor, e.g. one built with a custom config.
    pub fn with_extractor(mut self, extractor: ArticleExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn extractor(&self) -> &ArticleExtractor {
        &self.extractor
    }

    /// Raw bytes of a source: file contents or the downloaded body.
    pub fn load(&self, source: &Source) -> Result<Vec<u8>, IngestError> {
        match source {
            Source::Path(path) => std::fs::read(path).map_err(|source| IngestError::Io {
                path: path.clone(),
                source,
            }),
            Source::Url(url) => self.fetcher.get(url),
        }
    }

    /// Extract one article's metadata.
    pub fn extract(
        &self,
        source: &Source,
        ctx: &ExtractionContext,
        lookup: &dyn AuthorLookup,
    ) -> Result<ArticleRecord, IngestError> {
        let bytes = self.load(source)?;
        if source.is_text() {
            tracing::debug!(%source, "reading extracted text");
            let text = String::from_utf8_lossy(&bytes);
            return Ok(self.extractor.extract_from_text(&text, ctx, lookup));
        }
        self.extract_pdf(&bytes, ctx, lookup)
    }

    /// Classify a source by its first page.
    pub fn classify(&self, source: &Source) -> Result<FormatTag, IngestError> {
        let text = self.page_text(source, 1)?;
        Ok(self.extractor.classify(&text))
    }

    /// Text of the first `pages` pages. Text sources are returned whole.
    pub fn page_text(&self, source: &Source, pages: usize) -> Result<String, IngestError> {
        let bytes = self.load(source)?;
        if source.is_text() {
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }
        pdf_text(&bytes, pages)
    }

    #[cfg(feature = "pdf")]
    fn extract_pdf(
        &self,
        bytes: &[u8],
        ctx: &ExtractionContext,
        lookup: &dyn AuthorLookup,
    ) -> Result<ArticleRecord, IngestError> {
        let backend = rjmm_pdf_mupdf::MupdfBackend::new();
        Ok(self.extractor.extract_article(bytes, &backend, ctx, lookup)?)
    }

    #[cfg(not(feature = "pdf"))]
    fn extract_pdf(
        &self,
        _bytes: &[u8],
        _ctx: &ExtractionContext,
        _lookup: &dyn AuthorLookup,
    ) -> Result<ArticleRecord, IngestError> {
        Err(IngestError::NoPdfSupport)
    }
}

#[cfg(feature = "pdf")]
fn pdf_text(bytes: &[u8], pages: usize) -> Result<String, IngestError> {
    use rjmm_core::PdfBackend;

    let text = rjmm_pdf_mupdf::MupdfBackend::new()
        .extract_pages(bytes, pages)
        .map_err(rjmm_parsing::ParsingError::from)?;
    Ok(text)
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_bytes: &[u8], _pages: usize) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}
