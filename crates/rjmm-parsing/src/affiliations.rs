use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::AffiliationEntry;
use rjmm_core::text_utils::clean;

use crate::config::ParsingConfig;
use crate::predicates::{
    affiliation_marker, bare_affiliation_marker, is_affiliation_boundary,
    looks_like_institution_continuation_with_config, looks_like_institution_with_config,
    starts_new_affiliation, starts_with_marker,
};

/// Keywords that let a long line continue a legacy-layout affiliation.
const LEGACY_CONTINUATION_KEYWORDS: &[&str] = &[
    "university",
    "institute",
    "hospital",
    "faculty",
    "romania",
    "bucharest",
    "medicine",
    "pharmacy",
    "department",
    "clinic",
];

/// How a line after a marker line is judged as a continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationRule {
    /// The continuation denylist and length cap.
    Institution,
    /// Shorter than 50 characters, or names an institution keyword.
    ShortOrKeyword,
}

/// Parameters for one affiliation pass over a line window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationScan {
    /// First line index scanned.
    pub start: usize,
    /// One past the last line scanned; clamped to the page.
    pub end: usize,
    /// Join following lines onto a marker line.
    pub follow_continuations: bool,
    pub continuation: ContinuationRule,
    /// Accept a marker alone on its line, with the text on following lines.
    pub bare_markers: bool,
    /// Markers above this value are ignored.
    pub max_marker: Option<u32>,
    /// Accept a marker line whose text is merely longer than 5 characters.
    pub lenient_head: bool,
    /// A continuation starting with a lower-case letter ends the entry.
    pub stop_on_lowercase: bool,
}

impl AffiliationScan {
    /// One marker line per affiliation, no continuations.
    pub fn single_line(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            follow_continuations: false,
            continuation: ContinuationRule::Institution,
            bare_markers: false,
            max_marker: None,
            lenient_head: false,
            stop_on_lowercase: false,
        }
    }

    /// Marker lines followed by continuation lines.
    pub fn multi_line(start: usize, end: usize) -> Self {
        Self {
            follow_continuations: true,
            ..Self::single_line(start, end)
        }
    }
}

/// Drop a trailing page-number run: `"Bucharest, Romania 217"` → `"Bucharest, Romania"`.
pub fn strip_page_number(text: &str) -> String {
    static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\d+\s*$").unwrap());
    TRAILING_NUMBER.replace(text, "").into_owned()
}

fn is_continuation(line: &str, rule: ContinuationRule, config: &ParsingConfig) -> bool {
    match rule {
        ContinuationRule::Institution => looks_like_institution_continuation_with_config(line, config),
        ContinuationRule::ShortOrKeyword => {
            let lower = line.to_lowercase();
            line.chars().count() < 50
                || LEGACY_CONTINUATION_KEYWORDS
                    .iter()
                    .any(|k| lower.contains(k))
        }
    }
}

/// Assemble numbered affiliations from `lines[scan.start..scan.end]`.
///
/// The result is unique by number (first assembled entry wins) and sorted by
/// numeric marker value.
pub fn assemble(
    lines: &[String],
    scan: &AffiliationScan,
    config: &ParsingConfig,
) -> Vec<AffiliationEntry> {
    let end = scan.end.min(lines.len());
    let mut entries = Vec::new();
    let mut i = scan.start;

    while i < end {
        let line = lines[i].trim();

        if let Some((number, content)) = affiliation_marker(line) {
            let in_range = match scan.max_marker {
                Some(max) => number.parse::<u32>().is_ok_and(|n| n <= max),
                None => true,
            };
            let head_ok = looks_like_institution_with_config(content, config)
                || (scan.lenient_head && content.chars().count() > 5);
            if !in_range || !head_ok {
                i += 1;
                continue;
            }

            let mut parts = vec![content.to_string()];
            let mut j = i + 1;
            if scan.follow_continuations {
                while j < end {
                    let next = lines[j].trim();
                    if next.is_empty() {
                        j += 1;
                        continue;
                    }
                    if starts_new_affiliation(next) || is_affiliation_boundary(next) {
                        break;
                    }
                    if scan.stop_on_lowercase && next.chars().next().is_some_and(char::is_lowercase) {
                        break;
                    }
                    if !is_continuation(next, scan.continuation, config) {
                        break;
                    }
                    parts.push(next.to_string());
                    j += 1;
                }
            }

            accept(&mut entries, number, &parts, config);
            i = j;
            continue;
        }

        if scan.bare_markers
            && let Some(number) = bare_affiliation_marker(line)
        {
            let mut parts = Vec::new();
            let mut j = i + 1;
            while j < end {
                let next = lines[j].trim();
                if starts_with_marker(next) || is_affiliation_boundary(next) {
                    break;
                }
                if !next.is_empty() && is_continuation(next, scan.continuation, config) {
                    parts.push(next.to_string());
                }
                j += 1;
            }
            accept(&mut entries, number, &parts, config);
            i = j;
            continue;
        }

        i += 1;
    }

    dedup_and_sort(entries)
}

/// Join `parts` into one entry and keep it if it still reads as an institution.
fn accept(
    entries: &mut Vec<AffiliationEntry>,
    number: String,
    parts: &[String],
    config: &ParsingConfig,
) {
    let institution = strip_page_number(&clean(&parts.join(" ")));
    if institution.chars().count() > config.min_affiliation_len
        && looks_like_institution_with_config(&institution, config)
    {
        tracing::debug!(number = %number, institution = %institution, "affiliation");
        entries.push(AffiliationEntry::new(number, institution));
    }
}

/// Keep the first entry per number, then order by numeric value.
pub fn dedup_and_sort(entries: Vec<AffiliationEntry>) -> Vec<AffiliationEntry> {
    let mut seen = HashSet::new();
    let mut unique: Vec<AffiliationEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.number.clone()))
        .collect();
    unique.sort_by_key(AffiliationEntry::sort_key);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_single_superscript_affiliation() {
        let page = lines("² University of Bucharest, Romania\nAbstract: text");
        let affs = assemble(&page, &AffiliationScan::multi_line(0, 10), &ParsingConfig::default());
        assert_eq!(affs, vec![AffiliationEntry::new("2", "University of Bucharest, Romania")]);
    }

    #[test]
    fn test_multi_line_continuation() {
        let page = lines(
            "1 Department of Cardiology, Central Military\n\
             Emergency University Hospital, Bucharest, Romania\n\
             2 Carol Davila University of Medicine and Pharmacy, Bucharest\n\
             Corresponding author: Ion Popescu",
        );
        let affs = assemble(&page, &AffiliationScan::multi_line(0, 10), &ParsingConfig::default());
        assert_eq!(affs.len(), 2);
        assert_eq!(
            affs[0].institution,
            "Department of Cardiology, Central Military Emergency University Hospital, Bucharest, Romania"
        );
        assert_eq!(affs[1].number, "2");
    }

    #[test]
    fn test_single_line_ignores_continuation() {
        let page = lines("1 Faculty of Medicine, Cluj\nNapoca, Romania");
        let affs = assemble(&page, &AffiliationScan::single_line(0, 2), &ParsingConfig::default());
        assert_eq!(affs[0].institution, "Faculty of Medicine, Cluj");
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let page = lines(
            "3 Institute of Public Health, Bucharest\n\
             1 Military Medical Academy, Bucharest\n\
             3 Another Hospital Entry, Romania\n\
             10 Tenth Regional Hospital, Iasi",
        );
        let affs = assemble(&page, &AffiliationScan::single_line(0, 4), &ParsingConfig::default());
        let numbers: Vec<&str> = affs.iter().map(|a| a.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "3", "10"]);
        assert_eq!(affs[1].institution, "Institute of Public Health, Bucharest");
    }

    #[test]
    fn test_max_marker_rejects_dates() {
        let page = lines("20 February 2020 University Hospital\n2 Clinical Hospital of Iasi, Romania");
        let scan = AffiliationScan {
            max_marker: Some(9),
            ..AffiliationScan::multi_line(0, 2)
        };
        let affs = assemble(&page, &scan, &ParsingConfig::default());
        assert_eq!(affs, vec![AffiliationEntry::new("2", "Clinical Hospital of Iasi, Romania")]);
    }

    #[test]
    fn test_stop_on_lowercase_line() {
        let page = lines("1 Emergency Clinical Hospital, Bucharest\nwas admitted with fever");
        let scan = AffiliationScan {
            stop_on_lowercase: true,
            ..AffiliationScan::multi_line(0, 2)
        };
        let affs = assemble(&page, &scan, &ParsingConfig::default());
        assert_eq!(affs[0].institution, "Emergency Clinical Hospital, Bucharest");
    }

    #[test]
    fn test_bare_marker_gathers_following_lines() {
        let page = lines("1\nCarol Davila University\nBucharest, Romania\n2\nMilitary Hospital of Cluj");
        let scan = AffiliationScan {
            bare_markers: true,
            ..AffiliationScan::single_line(0, 5)
        };
        let affs = assemble(&page, &scan, &ParsingConfig::default());
        assert_eq!(affs.len(), 2);
        assert_eq!(affs[0].institution, "Carol Davila University Bucharest, Romania");
        assert_eq!(affs[1].institution, "Military Hospital of Cluj");
    }

    #[test]
    fn test_bare_marker_stops_at_section_boundary() {
        let page = lines(
            "1\nCarol Davila University\nBucharest, Romania\nAbstract: Military Hospital of Cluj\nUniversity Hospital data",
        );
        let scan = AffiliationScan {
            bare_markers: true,
            ..AffiliationScan::single_line(0, 5)
        };
        let affs = assemble(&page, &scan, &ParsingConfig::default());
        assert_eq!(affs, vec![AffiliationEntry::new("1", "Carol Davila University Bucharest, Romania")]);
    }

    #[test]
    fn test_trailing_page_number_stripped() {
        assert_eq!(strip_page_number("Bucharest, Romania 217"), "Bucharest, Romania");
        assert_eq!(strip_page_number("Hospital No. 2"), "Hospital No.");
        assert_eq!(strip_page_number("Romania"), "Romania");
    }

    #[test]
    fn test_short_entries_rejected() {
        let page = lines("1 Clinic, Cj");
        let scan = AffiliationScan {
            lenient_head: true,
            ..AffiliationScan::single_line(0, 1)
        };
        assert!(assemble(&page, &scan, &ParsingConfig::default()).is_empty());
    }
}
