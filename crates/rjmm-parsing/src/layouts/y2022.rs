use rjmm_core::FormatTag;

use super::LayoutStrategy;
use crate::affiliations::AffiliationScan;
use crate::config::ParsingConfig;
use crate::page::PageText;
use crate::predicates::looks_like_author_line;
use crate::title::{TitleAuthors, title_then_authors};

/// 2022 layout: the received/accepted sentence heads the page, followed by
/// title, authors and multi-line affiliations above `Corresponding author:`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout2022;

fn is_date_sentence(line: &str) -> bool {
    line.contains("The article was received on") && line.contains("accepted for publishing on")
}

impl LayoutStrategy for Layout2022 {
    fn tag(&self) -> FormatTag {
        FormatTag::Y2022
    }

    fn title_and_authors(&self, page: &PageText, _config: &ParsingConfig) -> TitleAuthors {
        let Some(anchor) = page.position(is_date_sentence) else {
            tracing::debug!("2022 layout without received/accepted sentence");
            return TitleAuthors::default();
        };
        title_then_authors(page.lines(), anchor + 1, looks_like_author_line)
    }

    /// From the top of the page to the last `Corresponding author:` line
    /// above `Abstract:`.
    fn affiliation_scan(&self, page: &PageText) -> Option<AffiliationScan> {
        let mut correspondence = None;
        for (i, line) in page.lines().iter().enumerate() {
            if line.contains("Corresponding author:") {
                correspondence = Some(i);
            } else if line.trim().starts_with("Abstract:") {
                break;
            }
        }
        let end = correspondence.unwrap_or(page.len());
        Some(AffiliationScan::multi_line(0, end))
    }
}
