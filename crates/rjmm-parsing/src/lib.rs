use thiserror::Error;

pub mod affiliations;
pub mod authors;
pub mod classify;
pub mod config;
pub mod dates;
pub mod extractor;
pub mod identifiers;
pub mod layouts;
pub mod page;
pub mod predicates;
pub mod sections;
pub mod title;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use extractor::{ArticleExtractor, ExtractionContext};
pub use layouts::{LayoutStrategy, strategy_for};
pub use page::PageText;
// Record types are defined in rjmm-core
pub use rjmm_core::{AffiliationEntry, ArticleRecord, AuthorEntry, AuthorLookup, FormatTag};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error(transparent)]
    Backend(#[from] rjmm_core::BackendError),
}

/// Classify first-page text into a layout tag.
pub fn classify(text: &str) -> FormatTag {
    ArticleExtractor::new().classify(text)
}

/// Parse already-extracted first-page text with the default configuration.
///
/// Pipeline:
/// 1. Classify the page into a layout
/// 2. Locate title and authors (or the caller's title, when given and found)
/// 3. Split authors, consulting `lookup` once per author
/// 4. Assemble affiliations, correspondence, dates, abstract, keywords,
///    article type, academic editor and issue header
pub fn parse_first_page(
    text: &str,
    title_override: Option<&str>,
    lookup: &dyn AuthorLookup,
) -> ArticleRecord {
    ArticleExtractor::new().parse_first_page(text, title_override, lookup)
}

/// Extract one article from PDF bytes using the given backend.
pub fn extract_article(
    pdf: &[u8],
    backend: &dyn rjmm_core::PdfBackend,
    ctx: &ExtractionContext,
    lookup: &dyn AuthorLookup,
) -> Result<ArticleRecord, ParsingError> {
    ArticleExtractor::new().extract_article(pdf, backend, ctx, lookup)
}
