use rjmm_core::text_utils::clean;
use rjmm_core::{ArticleRecord, AuthorLookup, FormatTag, PdfBackend};

use crate::authors::split_authors;
use crate::classify::{classify, needs_second_page};
use crate::config::ParsingConfig;
use crate::identifiers::extract_doi;
use crate::layouts::strategy_for;
use crate::page::PageText;
use crate::sections::year_token;
use crate::title::{TitleAuthors, locate_override};
use crate::ParsingError;

/// Caller-supplied facts about one article.
#[derive(Debug, Clone, Default)]
pub struct ExtractionContext {
    /// Source path or URL, copied to `article_file`.
    pub article_file: String,
    /// Issue designation such as `No.5 / 2025, Vol. CXXVIII, September`.
    /// Overrides any issue header found on the page.
    pub issue: Option<String>,
    /// Known article title; bypasses title detection when found on the page.
    pub title_override: Option<String>,
}

impl ExtractionContext {
    pub fn new(article_file: impl Into<String>) -> Self {
        Self {
            article_file: article_file.into(),
            ..Self::default()
        }
    }

    /// Fill `article_file`, and `issue`/`year` when an issue was given.
    pub fn apply(&self, record: &mut ArticleRecord) {
        record.article_file = self.article_file.clone();
        if let Some(issue) = self.issue.as_deref().map(clean)
            && !issue.is_empty()
        {
            if let Some(year) = year_token(&issue) {
                record.year = year.to_string();
            }
            record.issue = issue;
        }
    }
}

/// A configurable first-page extraction pipeline.
///
/// Holds a [`ParsingConfig`] and exposes classification and parsing as
/// methods. The default constructor uses built-in defaults; use
/// [`ArticleExtractor::with_config`] to supply custom patterns and thresholds.
pub struct ArticleExtractor {
    config: ParsingConfig,
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Classify page text into a layout tag.
    pub fn classify(&self, text: &str) -> FormatTag {
        classify(PageText::new(text).text())
    }

    /// Parse already-extracted first-page text into a record.
    pub fn parse_first_page(
        &self,
        text: &str,
        title_override: Option<&str>,
        lookup: &dyn AuthorLookup,
    ) -> ArticleRecord {
        self.parse_page(&PageText::new(text), title_override, lookup)
    }

    /// Classify `page` and parse it with the matching layout.
    pub fn parse_page(
        &self,
        page: &PageText,
        title_override: Option<&str>,
        lookup: &dyn AuthorLookup,
    ) -> ArticleRecord {
        self.parse_page_as(page, classify(page.text()), title_override, lookup)
    }

    /// Parse `page` with the layout for `tag`, skipping classification.
    ///
    /// Every field is attempted independently; a field whose anchor is missing
    /// stays empty.
    pub fn parse_page_as(
        &self,
        page: &PageText,
        tag: FormatTag,
        title_override: Option<&str>,
        lookup: &dyn AuthorLookup,
    ) -> ArticleRecord {
        let layout = strategy_for(tag);
        let config = &self.config;

        let TitleAuthors { title, authors } = title_override
            .and_then(|t| locate_override(page.text(), t))
            .unwrap_or_else(|| layout.title_and_authors(page, config));
        let correspondence = layout.correspondence(page);
        let dates = layout.dates(page);
        let issue = layout.issue_header(page).unwrap_or_default();
        let year = year_token(&issue)
            .or(layout.fallback_year())
            .unwrap_or_default()
            .to_string();

        let record = ArticleRecord {
            format_detected: tag,
            doi: extract_doi(page.text()),
            title,
            authors: split_authors(&authors, lookup),
            authors_full: authors,
            affiliations: layout.affiliations(page, config),
            correspondence_email: correspondence.email,
            correspondence_full: correspondence.full,
            academic_editor: layout.academic_editor(page),
            received: dates.received,
            revised: dates.revised,
            accepted: dates.accepted,
            abstract_text: layout.abstract_text(page, config),
            keywords: layout.keywords(page),
            article_type: layout.article_type(page, config),
            issue,
            year,
            article_file: String::new(),
        };

        tracing::debug!(
            tag = %tag,
            authors = record.authors.len(),
            affiliations = record.affiliations.len(),
            "page parsed"
        );
        record
    }

    /// Parse already-extracted text and apply the caller's context.
    pub fn extract_from_text(
        &self,
        text: &str,
        ctx: &ExtractionContext,
        lookup: &dyn AuthorLookup,
    ) -> ArticleRecord {
        let mut record = self.parse_first_page(text, ctx.title_override.as_deref(), lookup);
        ctx.apply(&mut record);
        record
    }

    /// Run the full pipeline on PDF bytes.
    ///
    /// Extracts the first page and classifies it; layouts whose header fields
    /// spill onto the second page are re-extracted with two pages and parsed
    /// under the first page's tag. Only a text-extraction failure is an error.
    pub fn extract_article(
        &self,
        pdf: &[u8],
        backend: &dyn PdfBackend,
        ctx: &ExtractionContext,
        lookup: &dyn AuthorLookup,
    ) -> Result<ArticleRecord, ParsingError> {
        let first = PageText::new(&backend.extract_pages(pdf, 1)?);
        let tag = classify(first.text());

        let page = if needs_second_page(tag) {
            tracing::debug!(tag = %tag, "re-extracting with two pages");
            PageText::new(&backend.extract_pages(pdf, 2)?)
        } else {
            first
        };

        let mut record = self.parse_page_as(&page, tag, ctx.title_override.as_deref(), lookup);
        ctx.apply(&mut record);
        tracing::info!(
            file = %record.article_file,
            format = %record.format_detected,
            title = %record.title,
            "article extracted"
        );
        Ok(record)
    }
}
