use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::FormatTag;
use rjmm_core::text_utils::clean;

use super::LayoutStrategy;
use crate::affiliations::{AffiliationScan, ContinuationRule};
use crate::config::ParsingConfig;
use crate::dates::{Dates, parse_dates};
use crate::page::PageText;
use crate::predicates::{is_body_section_heading, starts_with_marker};
use crate::sections;
use crate::title::TitleAuthors;

/// 2014 layout: fixed line positions under a `Vol. ... No. n/2014` header.
///
/// Line 0 carries the issue, line 2 the article type, the received/accepted
/// sentence sits in the first ten lines and title and authors start at line 6.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout2014;

const ARTICLE_TYPE_LINE: usize = 2;
const TITLE_LINES: Range<usize> = 6..12;
const AUTHOR_LINES: Range<usize> = 6..15;
const MAX_TITLE_LINES: usize = 2;
const DATE_WINDOW: usize = 10;
const MAX_MARKER: u32 = 5;

/// Two capitalised words followed somewhere by a digit.
static NAMES_WITH_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+.*?\d").unwrap());
static TWO_NAMES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+").unwrap());

fn title_lines(page: &PageText) -> Vec<&str> {
    static WORDS_THEN_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\w+\s+\w+\s*\d").unwrap());

    let mut title = Vec::new();
    for i in TITLE_LINES.start..TITLE_LINES.end.min(page.len()) {
        let line = page.line(i).trim();
        let lower = line.to_lowercase();
        if !line.is_empty()
            && !line.starts_with("http")
            && !lower.contains("received on")
            && !lower.contains("accepted for publishing")
            && !WORDS_THEN_DIGIT.is_match(line)
            && !line.starts_with("Abstract:")
        {
            title.push(line);
        }
        if NAMES_WITH_DIGIT.is_match(line)
            || line.starts_with("Abstract:")
            || title.len() >= MAX_TITLE_LINES
        {
            break;
        }
    }
    title
}

fn author_line(page: &PageText) -> String {
    for i in AUTHOR_LINES.start..AUTHOR_LINES.end.min(page.len()) {
        let line = page.line(i).trim();
        if line.starts_with("Abstract:") || !NAMES_WITH_DIGIT.is_match(line) {
            continue;
        }
        let next = page.line(i + 1).trim();
        if !next.is_empty()
            && !next.starts_with("Abstract:")
            && !starts_with_marker(next)
            && TWO_NAMES.is_match(next)
        {
            return format!("{line} {next}");
        }
        return line.to_string();
    }
    String::new()
}

impl LayoutStrategy for Layout2014 {
    fn tag(&self) -> FormatTag {
        FormatTag::Y2014
    }

    fn title_and_authors(&self, page: &PageText, _config: &ParsingConfig) -> TitleAuthors {
        let title = clean(&title_lines(page).join(" "));
        let authors = clean(&author_line(page));
        TitleAuthors { title, authors }
    }

    /// Markers 1 to 5 down to the first body section heading; short lines
    /// and lines naming an institution continue an entry.
    fn affiliation_scan(&self, page: &PageText) -> Option<AffiliationScan> {
        let end = page.position(is_body_section_heading).unwrap_or(page.len());
        Some(AffiliationScan {
            continuation: ContinuationRule::ShortOrKeyword,
            max_marker: Some(MAX_MARKER),
            lenient_head: true,
            ..AffiliationScan::multi_line(0, end)
        })
    }

    /// The one-line received/accepted sentence near the top; the shared
    /// patterns otherwise.
    fn dates(&self, page: &PageText) -> Dates {
        static SENTENCE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)Article received on (.+?) and accepted for publishing on (.+?)\.?$")
                .unwrap()
        });

        let found = page
            .lines()
            .iter()
            .take(DATE_WINDOW)
            .find(|l| l.contains("Article received on"))
            .and_then(|l| SENTENCE.captures(l.trim()));
        match found {
            Some(caps) => Dates {
                received: clean(&caps[1]),
                revised: String::new(),
                accepted: clean(&caps[2]),
            },
            None => parse_dates(page.text()),
        }
    }

    fn abstract_text(&self, page: &PageText, _config: &ParsingConfig) -> String {
        sections::extract_abstract_legacy(page)
    }

    /// Printed verbatim on its own line.
    fn article_type(&self, page: &PageText, _config: &ParsingConfig) -> String {
        clean(page.line(ARTICLE_TYPE_LINE))
    }

    fn issue_header(&self, page: &PageText) -> Option<String> {
        static ISSUE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)Vol\.\s+[IVXLC]+.*?No\.\s*[\d\-]+/2014").unwrap()
        });
        ISSUE.find(page.line(0)).map(|m| clean(m.as_str()))
    }

    fn fallback_year(&self) -> Option<&'static str> {
        Some("2014")
    }
}
