use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::FormatTag;

use super::LayoutStrategy;
use crate::affiliations::AffiliationScan;
use crate::config::ParsingConfig;
use crate::identifiers::{CorrespondenceLabel, content_after_doi};
use crate::page::{PageText, skip_blank};
use crate::predicates::{is_author_block_end, is_correspondence_line, looks_like_author_line};
use crate::title::TitleAuthors;

/// 2023 and 2024 layouts: title and authors follow the DOI; affiliations sit
/// above the correspondence line, sometimes with the marker on a line of its
/// own.
#[derive(Debug, Clone, Copy)]
pub struct RecentLayout {
    tag: FormatTag,
    /// Skip a running volume header and an article-type label before the title.
    skip_header: bool,
}

impl RecentLayout {
    pub const fn new(tag: FormatTag, skip_header: bool) -> Self {
        Self { tag, skip_header }
    }
}

fn is_received_sentence(line: &str) -> bool {
    line.starts_with("The article was received on") || line.starts_with("article was received on")
}

impl LayoutStrategy for RecentLayout {
    fn tag(&self) -> FormatTag {
        self.tag
    }

    fn title_and_authors(&self, page: &PageText, config: &ParsingConfig) -> TitleAuthors {
        static VOLUME_HEADER: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)^Vol\.\s+[IVXLC]+\b.*Romanian Journal of Military Medicine").unwrap()
        });

        let lines: Vec<&str> = content_after_doi(page.text()).lines().collect();
        let line = |i: usize| lines.get(i).map_or("", |l| l.trim());

        let mut i = skip_blank(&lines, 0);
        if is_received_sentence(line(i)) {
            i += 1;
        }
        i = skip_blank(&lines, i);

        if self.skip_header {
            if VOLUME_HEADER.is_match(line(i)) {
                i = skip_blank(&lines, i + 1);
            }
            if config.is_article_type_label(line(i)) {
                i = skip_blank(&lines, i + 1);
            }
        }

        let mut title = Vec::new();
        while i < lines.len() {
            let l = line(i);
            if l.is_empty() || looks_like_author_line(l) {
                break;
            }
            title.push(l);
            i += 1;
        }

        i = skip_blank(&lines, i);
        let mut authors = Vec::new();
        while i < lines.len() && !is_author_block_end(lines[i]) {
            let l = line(i);
            if !l.is_empty() {
                authors.push(l);
            }
            i += 1;
        }

        TitleAuthors::from_parts(&title, &authors)
    }

    /// The top of the page down to the first correspondence line; without one
    /// there is no affiliation block.
    fn affiliation_scan(&self, page: &PageText) -> Option<AffiliationScan> {
        let end = page.position(is_correspondence_line)?;
        Some(AffiliationScan {
            bare_markers: true,
            ..AffiliationScan::single_line(0, end)
        })
    }

    fn correspondence_labels(&self) -> &'static [CorrespondenceLabel] {
        &[
            CorrespondenceLabel::Correspondence,
            CorrespondenceLabel::CorrespondingAuthor,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rjmm_core::AffiliationEntry;

    const LAYOUT_2023: RecentLayout = RecentLayout::new(FormatTag::Y2023, true);
    const LAYOUT_2024: RecentLayout = RecentLayout::new(FormatTag::Y2024, false);

    #[test]
    fn test_2023_skips_header_and_label() {
        let page = PageText::new(
            "https://doi.org/10.55453/rjmm.2023.126.3.4\n\
             The article was received on May 3, 2023, and accepted for publishing on June 9, 2023.\n\
             \n\
             Vol. CXXVI • No. 3/2023 • Romanian Journal of Military Medicine\n\
             ORIGINAL ARTICLE\n\
             \n\
             Burnout Among Military Physicians\n\
             \n\
             Radu Matei1, Ioana Stoica1,2\n\
             1\n\
             Military Medical Academy,\n\
             Bucharest, Romania\n\
             2 Central Military Emergency University Hospital, Bucharest\n\
             Correspondence: Radu Matei, e-mail: radu.matei@amm.ro\n",
        );
        let found = LAYOUT_2023.title_and_authors(&page, &ParsingConfig::default());
        assert_eq!(found.title, "Burnout Among Military Physicians");
        assert_eq!(found.authors, "Radu Matei1, Ioana Stoica1,2");

        let affs = LAYOUT_2023.affiliations(&page, &ParsingConfig::default());
        assert_eq!(
            affs,
            vec![
                AffiliationEntry::new("1", "Military Medical Academy, Bucharest, Romania"),
                AffiliationEntry::new("2", "Central Military Emergency University Hospital, Bucharest"),
            ]
        );
    }

    #[test]
    fn test_2024_title_ends_at_blank() {
        let page = PageText::new(
            "CASE REPORT\n\
             https://doi.org/10.55453/rjmm.2024.127.2.9\n\
             Penetrating Neck Trauma\n\
             \n\
             Alin Voicu1, Sorin Neagu2\n\
             Abstract: ...\n",
        );
        let found = LAYOUT_2024.title_and_authors(&page, &ParsingConfig::default());
        assert_eq!(found.title, "Penetrating Neck Trauma");
        assert_eq!(found.authors, "Alin Voicu1, Sorin Neagu2");
    }

    #[test]
    fn test_no_correspondence_no_affiliations() {
        let page = PageText::new("1 Carol Davila University, Bucharest\nAbstract: x");
        assert!(LAYOUT_2024.affiliation_scan(&page).is_none());
        assert!(LAYOUT_2024.affiliations(&page, &ParsingConfig::default()).is_empty());
    }
}
