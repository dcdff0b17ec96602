//! Abstract, keywords, academic editor, article type and issue header.

use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::text_utils::clean;

use crate::config::ParsingConfig;
use crate::dates::cut_at_next_label;
use crate::page::PageText;
use crate::predicates::{is_correspondence_line, is_uppercase_heading};

const ABSTRACT_LABEL: &str = "Abstract:";
const KEYWORDS_LABEL: &str = "Keywords:";

/// Extract the abstract.
///
/// Line scan first: the last `Abstract:` line before the first `Keywords:`
/// line, joined with the following lines up to `Keywords:`. The result must
/// fall inside the configured length bounds and contain none of the reject
/// tokens. Otherwise a regex between `Abstract:` and `Keywords:` (or the end)
/// is tried with only the lower bound.
pub fn extract_abstract(page: &PageText, config: &ParsingConfig) -> String {
    static FALLBACK: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)Abstract:\s*(.+?)(?:Keywords?:|\z)").unwrap());

    let lines = page.lines();
    let mut start = None;
    let mut keywords = None;
    for (i, line) in lines.iter().enumerate() {
        let t = line.trim();
        if t.starts_with(ABSTRACT_LABEL) {
            start = Some(i);
        } else if t.starts_with(KEYWORDS_LABEL) {
            keywords = Some(i);
            break;
        }
    }

    if let Some(start) = start {
        let end = keywords.unwrap_or(lines.len());
        let mut parts = Vec::new();
        let head = lines[start].trim()[ABSTRACT_LABEL.len()..].trim();
        if !head.is_empty() {
            parts.push(head);
        }
        for line in &lines[start + 1..end] {
            let t = line.trim();
            if t.is_empty() {
                continue;
            }
            if t.starts_with(KEYWORDS_LABEL) {
                break;
            }
            parts.push(t);
        }

        let candidate = clean(&parts.join(" "));
        if is_plausible_abstract(&candidate, config) {
            return candidate;
        }
        tracing::debug!(len = candidate.len(), "line-scanned abstract rejected");
    }

    if let Some(caps) = FALLBACK.captures(page.text()) {
        let candidate = clean(&caps[1]);
        if candidate.chars().count() > config.abstract_min_len {
            return candidate;
        }
    }
    String::new()
}

fn is_plausible_abstract(text: &str, config: &ParsingConfig) -> bool {
    let len = text.chars().count();
    if len <= config.abstract_min_len || len >= config.abstract_max_len {
        return false;
    }
    let lower = text.to_lowercase();
    !config
        .abstract_reject_tokens()
        .iter()
        .any(|token| lower.contains(token.as_str()))
}

/// Legacy abstract: from the first `Abstract:` line until `Keywords:` or an
/// upper-case section heading. No validation.
pub fn extract_abstract_legacy(page: &PageText) -> String {
    let Some(start) = page.position(|l| l.starts_with(ABSTRACT_LABEL)) else {
        return String::new();
    };

    let mut parts = Vec::new();
    for (offset, line) in page.lines()[start..].iter().enumerate() {
        let t = line.trim();
        if t.starts_with(KEYWORDS_LABEL) || (offset > 0 && is_uppercase_heading(t)) {
            break;
        }
        let t = if offset == 0 {
            t[ABSTRACT_LABEL.len()..].trim()
        } else {
            t
        };
        if !t.is_empty() {
            parts.push(t);
        }
    }
    clean(&parts.join(" "))
}

/// Rest of the first `Keyword(s):` line.
pub fn extract_keywords(text: &str) -> String {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Keywords?:\s*([^\n\r]+)").unwrap());
    RE.captures(text)
        .map(|caps| clean(&caps[1]))
        .unwrap_or_default()
}

/// The handling editor, from `Academic Editor:` or a bare `Editor:` label.
pub fn extract_academic_editor(text: &str) -> String {
    static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?i)Academic Editor\s*:\s*([^\n\r]+)",
            r"(?i)\bEditor\s*:\s*([^\n\r]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    PATTERNS
        .iter()
        .filter_map(|re| re.captures(text))
        .map(|caps| cut_at_next_label(&caps[1]))
        .find(|editor| !editor.is_empty())
        .unwrap_or_default()
}

/// Canonical article categories and the phrases that identify them.
const ARTICLE_TYPE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Original Research",
        &[r"original\s+research", r"research\s+article", r"original\s+articles?"],
    ),
    (
        "Review",
        &[
            r"review\s+article",
            r"systematic\s+review",
            r"literature\s+review",
            r"narrative\s+review",
            r"mini.?review",
            r"^review$",
        ],
    ),
    (
        "Case Report",
        &[r"case\s+report", r"case\s+study", r"clinical\s+case"],
    ),
    ("Editorial", &[r"editorial", r"editor.?s?\s+note"]),
    ("Letter", &[r"letter\s+to\s+(?:the\s+)?editor", r"\bletter\b"]),
    (
        "Short Communication",
        &[
            r"short\s+communication",
            r"brief\s+communication",
            r"rapid\s+communication",
        ],
    ),
    ("Commentary", &[r"commentary", r"perspective", r"viewpoint"]),
    (
        "Technical Note",
        &[r"technical\s+note", r"methodology", r"protocol"],
    ),
];

static CATEGORY_PATTERNS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    ARTICLE_TYPE_CATEGORIES
        .iter()
        .map(|(category, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(&format!("(?im){p}")).unwrap())
                .collect();
            (*category, compiled)
        })
        .collect()
});

fn category_of(text: &str) -> Option<&'static str> {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(text)))
        .map(|(category, _)| *category)
}

/// `"CLINICAL PRACTICE"` → `"Clinical Practice"`.
fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lines searched for an article type: everything above `Abstract:`.
const HEADER_WINDOW: usize = 20;

/// Detect the article category.
///
/// A standalone article-type label among the first lines wins; otherwise the
/// header region (above `Abstract:`, correspondence lines excluded) is
/// searched for category phrases. Empty when nothing matches.
pub fn detect_article_type(page: &PageText, config: &ParsingConfig) -> String {
    if let Some(label) = page
        .lines()
        .iter()
        .take(HEADER_WINDOW)
        .map(|l| l.trim())
        .find(|l| config.is_article_type_label(l))
    {
        return category_of(label)
            .map(str::to_string)
            .unwrap_or_else(|| title_case(label));
    }

    let end = page
        .position(|l| l.starts_with(ABSTRACT_LABEL))
        .unwrap_or(HEADER_WINDOW.min(page.len()));
    let header = page.lines()[..end]
        .iter()
        .filter(|l| !is_correspondence_line(l))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    category_of(&header).map(str::to_string).unwrap_or_default()
}

static VOLUME_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Vol\.\s+[IVXLC]+.*?No\.\s*[\d\-]+\s*/\s*\d{4}").unwrap()
});

/// A running `Vol. <roman> ... No. <n>/<yyyy>` header within the first 15 lines.
pub fn volume_header(page: &PageText) -> Option<String> {
    page.lines()
        .iter()
        .take(15)
        .find_map(|l| VOLUME_HEADER.find(l))
        .map(|m| clean(m.as_str()))
}

/// First stand-alone four-digit token of an issue string.
pub fn year_token(issue: &str) -> Option<&str> {
    static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());
    YEAR.find(issue).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "Background: sepsis remains a leading cause of death among military personnel deployed abroad.";

    #[test]
    fn test_abstract_line_scan() {
        let page = PageText::new(&format!(
            "Title\nAbstract: {LONG}\nMethods were reviewed.\n\nKeywords: sepsis, shock\nINTRODUCTION"
        ));
        assert_eq!(
            extract_abstract(&page, &ParsingConfig::default()),
            format!("{LONG} Methods were reviewed.")
        );
    }

    #[test]
    fn test_abstract_last_label_before_keywords() {
        let page = PageText::new(&format!(
            "Abstract: see page 2\nAbstract:\n{LONG}\nKeywords: x"
        ));
        assert_eq!(extract_abstract(&page, &ParsingConfig::default()), LONG);
    }

    #[test]
    fn test_abstract_reject_token_falls_back_to_regex() {
        // The line scan rejects "Table"; the regex fallback has no token check.
        let page = PageText::new(&format!("Abstract: {LONG} Table 1 lists data.\nKeywords: x"));
        let abstract_text = extract_abstract(&page, &ParsingConfig::default());
        assert!(abstract_text.ends_with("Table 1 lists data."));
    }

    #[test]
    fn test_abstract_too_short() {
        let page = PageText::new("Abstract: short\nKeywords: x");
        assert_eq!(extract_abstract(&page, &ParsingConfig::default()), "");
        assert_eq!(extract_abstract(&PageText::new("no abstract"), &ParsingConfig::default()), "");
    }

    #[test]
    fn test_legacy_abstract_stops_at_heading() {
        let page = PageText::new("Abstract: The prostate gland\nis examined.\nANATOMY OF THE PROSTATE GLAND\nbody");
        assert_eq!(extract_abstract_legacy(&page), "The prostate gland is examined.");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(extract_keywords("x\nKeywords:  sepsis,  shock \ny"), "sepsis, shock");
        assert_eq!(extract_keywords("KEYWORD: trauma"), "trauma");
        assert_eq!(extract_keywords("none"), "");
    }

    #[test]
    fn test_academic_editor() {
        assert_eq!(
            extract_academic_editor("Academic Editor: Octavian Vasiliu Received: 21 June 2025"),
            "Octavian Vasiliu"
        );
        assert_eq!(extract_academic_editor("Editor: Ion Pop\n"), "Ion Pop");
        assert_eq!(extract_academic_editor("no editor"), "");
    }

    #[test]
    fn test_article_type_from_label() {
        let config = ParsingConfig::default();
        let page = PageText::new("RJMM\n\nSYSTEMATIC REVIEW\nTitle");
        assert_eq!(detect_article_type(&page, &config), "Review");
        let page = PageText::new("CLINICAL PRACTICE\nTitle");
        assert_eq!(detect_article_type(&page, &config), "Clinical Practice");
    }

    #[test]
    fn test_article_type_from_header_phrases() {
        let config = ParsingConfig::default();
        let page = PageText::new(
            "A case report of pulmonary embolism\nCorrespondence: letter@x.org\nAbstract: ...\nreview article",
        );
        assert_eq!(detect_article_type(&page, &config), "Case Report");
        assert_eq!(detect_article_type(&PageText::new("Nothing here"), &config), "");
    }

    #[test]
    fn test_volume_header_and_year() {
        let page = PageText::new("Vol. CXXIII • No. 1/2020 • Romanian Journal of Military Medicine\n");
        let header = volume_header(&page).unwrap();
        assert_eq!(header, "Vol. CXXIII • No. 1/2020");
        assert_eq!(year_token(&header), Some("2020"));
        assert_eq!(year_token("No.5 / 2025, Vol. CXXVIII"), Some("2025"));
        assert_eq!(year_token("Vol. X"), None);
    }
}
