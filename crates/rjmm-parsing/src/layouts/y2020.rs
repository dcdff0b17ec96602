use rjmm_core::FormatTag;

use super::LayoutStrategy;
use crate::affiliations::AffiliationScan;
use crate::config::ParsingConfig;
use crate::page::{PageText, skip_blank};
use crate::predicates::{is_body_section_heading, looks_like_unnumbered_author_line};
use crate::title::{TitleAuthors, title_then_authors};

/// 2020 layout: an article-type label, the received/accepted sentence, then
/// title and authors. Affiliations may continue on the second page.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout2020;

/// The article-type label is expected within this many lines.
const LABEL_WINDOW: usize = 20;

/// Two-digit markers in this layout are dates and page furniture.
const MAX_MARKER: u32 = 9;

impl LayoutStrategy for Layout2020 {
    fn tag(&self) -> FormatTag {
        FormatTag::Y2020
    }

    fn title_and_authors(&self, page: &PageText, config: &ParsingConfig) -> TitleAuthors {
        let lines = page.lines();
        let Some(label) = lines
            .iter()
            .take(LABEL_WINDOW)
            .position(|l| config.is_article_type_label(l))
        else {
            tracing::debug!("2020 layout without article-type label");
            return TitleAuthors::default();
        };

        let mut i = skip_blank(lines, label + 1);
        let line = page.line(i);
        if line.contains("Article received on") || line.contains("The article was received on") {
            i += 1;
        }
        title_then_authors(lines, i, looks_like_unnumbered_author_line)
    }

    /// The whole page up to the first body section heading.
    fn affiliation_scan(&self, page: &PageText) -> Option<AffiliationScan> {
        let end = page.position(is_body_section_heading).unwrap_or(page.len());
        Some(AffiliationScan {
            max_marker: Some(MAX_MARKER),
            lenient_head: true,
            stop_on_lowercase: true,
            ..AffiliationScan::multi_line(0, end)
        })
    }
}
