use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::FormatTag;
use rjmm_core::text_utils::fold_diacritics;

use super::LayoutStrategy;
use crate::affiliations::AffiliationScan;
use crate::config::ParsingConfig;
use crate::identifiers::CorrespondenceLabel;
use crate::page::PageText;
use crate::predicates::looks_like_author_line;
use crate::title::TitleAuthors;

/// 2025 layout: article type, DOI, title, authors and single-line
/// affiliations at nearly fixed line positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout2025;

/// Affiliations start after the author line.
const AFFILIATIONS_FROM: usize = 7;

fn first_in_window<'a>(
    page: &'a PageText,
    from: usize,
    to: usize,
    pred: impl Fn(&str) -> bool,
) -> Option<(usize, &'a str)> {
    (from..to.min(page.len()))
        .map(|i| (i, page.line(i).trim()))
        .find(|&(_, line)| !line.is_empty() && pred(line))
}

impl LayoutStrategy for Layout2025 {
    fn tag(&self) -> FormatTag {
        FormatTag::Y2025
    }

    fn title_and_authors(&self, page: &PageText, _config: &ParsingConfig) -> TitleAuthors {
        static LEADING_NAME_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\w+\s*,").unwrap());

        let title = first_in_window(page, 3, 7, |line| {
            !line.starts_with("http") && !LEADING_NAME_COMMA.is_match(line)
        });
        let authors = first_in_window(page, 5, 9, looks_like_author_line);
        if let Some((i, _)) = title {
            tracing::debug!(line = i, "2025 title");
        }

        TitleAuthors {
            title: title.map(|(_, t)| fold_diacritics(t)).unwrap_or_default(),
            authors: authors.map(|(_, a)| fold_diacritics(a)).unwrap_or_default(),
        }
    }

    /// Between the author line and the last `Correspondence:` line above
    /// `Abstract:` (or `Abstract:` itself, or the end of the page).
    fn affiliation_scan(&self, page: &PageText) -> Option<AffiliationScan> {
        let mut correspondence = None;
        let mut abstract_at = None;
        for (i, line) in page.lines().iter().enumerate() {
            let t = line.trim();
            if t.starts_with("Correspondence:") {
                correspondence = Some(i);
            } else if t.starts_with("Abstract:") {
                abstract_at = Some(i);
                break;
            }
        }
        let end = correspondence.or(abstract_at).unwrap_or(page.len());
        Some(AffiliationScan::single_line(AFFILIATIONS_FROM, end))
    }

    fn correspondence_labels(&self) -> &'static [CorrespondenceLabel] {
        &[
            CorrespondenceLabel::Correspondence,
            CorrespondenceLabel::CorrespondingAuthor,
        ]
    }
}
