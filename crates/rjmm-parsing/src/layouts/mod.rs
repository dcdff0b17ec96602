//! One extraction strategy per journal layout.
//!
//! Every layout answers the same questions through [`LayoutStrategy`]; the
//! provided methods are the rules shared by most eras and are overridden
//! where an era differs. [`strategy_for`] is the dispatch table.

mod recent;
mod y2014;
mod y2020;
mod y2022;
mod y2025;

use rjmm_core::{AffiliationEntry, FormatTag};

use crate::affiliations::{AffiliationScan, assemble};
use crate::config::ParsingConfig;
use crate::dates::{Dates, parse_dates};
use crate::identifiers::{Correspondence, CorrespondenceLabel, extract_correspondence};
use crate::page::PageText;
use crate::sections;
use crate::title::TitleAuthors;

pub use recent::RecentLayout;
pub use y2014::Layout2014;
pub use y2020::Layout2020;
pub use y2022::Layout2022;
pub use y2025::Layout2025;

/// Field-location rules for one layout.
pub trait LayoutStrategy: Send + Sync {
    fn tag(&self) -> FormatTag;

    /// Title and the raw author line.
    fn title_and_authors(&self, page: &PageText, config: &ParsingConfig) -> TitleAuthors;

    /// Where affiliations are looked for, or `None` if the page has no
    /// affiliation block for this layout.
    fn affiliation_scan(&self, page: &PageText) -> Option<AffiliationScan>;

    fn affiliations(&self, page: &PageText, config: &ParsingConfig) -> Vec<AffiliationEntry> {
        match self.affiliation_scan(page) {
            Some(scan) => assemble(page.lines(), &scan, config),
            None => Vec::new(),
        }
    }

    /// Correspondence labels in the order they are tried.
    fn correspondence_labels(&self) -> &'static [CorrespondenceLabel] {
        &[
            CorrespondenceLabel::CorrespondingAuthor,
            CorrespondenceLabel::Correspondence,
        ]
    }

    fn correspondence(&self, page: &PageText) -> Correspondence {
        extract_correspondence(page.text(), self.correspondence_labels())
    }

    fn dates(&self, page: &PageText) -> Dates {
        parse_dates(page.text())
    }

    fn abstract_text(&self, page: &PageText, config: &ParsingConfig) -> String {
        sections::extract_abstract(page, config)
    }

    fn keywords(&self, page: &PageText) -> String {
        sections::extract_keywords(page.text())
    }

    fn article_type(&self, page: &PageText, config: &ParsingConfig) -> String {
        sections::detect_article_type(page, config)
    }

    fn academic_editor(&self, page: &PageText) -> String {
        sections::extract_academic_editor(page.text())
    }

    /// Issue designation printed on the page, if the layout carries one.
    fn issue_header(&self, page: &PageText) -> Option<String> {
        sections::volume_header(page)
    }

    /// Year used when no issue string yields one.
    fn fallback_year(&self) -> Option<&'static str> {
        None
    }
}

static LAYOUT_2014: Layout2014 = Layout2014;
static LAYOUT_2020: Layout2020 = Layout2020;
static LAYOUT_2022: Layout2022 = Layout2022;
static LAYOUT_2023: RecentLayout = RecentLayout::new(FormatTag::Y2023, true);
static LAYOUT_2024: RecentLayout = RecentLayout::new(FormatTag::Y2024, false);
static LAYOUT_2025: Layout2025 = Layout2025;

/// The strategy for `tag`.
pub fn strategy_for(tag: FormatTag) -> &'static dyn LayoutStrategy {
    match tag {
        FormatTag::Y2014 => &LAYOUT_2014,
        FormatTag::Y2020 => &LAYOUT_2020,
        FormatTag::Y2022 => &LAYOUT_2022,
        FormatTag::Y2023 => &LAYOUT_2023,
        FormatTag::Y2024 => &LAYOUT_2024,
        FormatTag::Y2025 => &LAYOUT_2025,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_has_its_strategy() {
        for tag in FormatTag::ALL {
            assert_eq!(strategy_for(tag).tag(), tag);
        }
    }

    #[test]
    fn test_empty_page_yields_empty_fields() {
        let page = PageText::new("");
        let config = ParsingConfig::default();
        for tag in FormatTag::ALL {
            let layout = strategy_for(tag);
            assert_eq!(layout.title_and_authors(&page, &config), TitleAuthors::default());
            assert!(layout.affiliations(&page, &config).is_empty());
            assert_eq!(layout.dates(&page), Dates::default());
            assert_eq!(layout.abstract_text(&page, &config), "");
            assert_eq!(layout.article_type(&page, &config), "");
        }
    }
}
