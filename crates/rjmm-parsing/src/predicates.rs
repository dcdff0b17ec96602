//! Named line classifiers shared by every layout.
//!
//! These are the decision points of field extraction: each answers one
//! "does this line look like X" question and is tested on its own.

use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::text_utils::{is_superscript_digit, translate_superscript};

use crate::config::ParsingConfig;

/// Marker: plain digits or superscript digits at line start.
const MARKER: &str = r"^\s*([0-9]+|[⁰¹²³⁴⁵⁶⁷⁸⁹]+)";

/// `"² University of Bucharest"` → `("2", "University of Bucharest")`.
///
/// The marker must be followed by whitespace and content.
pub fn affiliation_marker(line: &str) -> Option<(String, &str)> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"{MARKER}\s+(.*)$")).unwrap());
    let caps = RE.captures(line)?;
    let number = translate_superscript(caps.get(1)?.as_str());
    let content = caps.get(2)?.as_str().trim();
    if content.is_empty() {
        return None;
    }
    Some((number, content))
}

/// A line consisting of a marker alone, e.g. `"3"` or `"¹"`.
pub fn bare_affiliation_marker(line: &str) -> Option<String> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"{MARKER}\s*$")).unwrap());
    RE.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| translate_superscript(m.as_str()))
}

/// Whether the line opens with a marker (alone or followed by whitespace).
pub fn starts_with_marker(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"{MARKER}(\s|$)")).unwrap());
    RE.is_match(line)
}

/// Whether the line opens a new affiliation: a marker and a capitalised word.
pub fn starts_new_affiliation(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"{MARKER}\s+[A-Z]")).unwrap());
    RE.is_match(line)
}

fn has_reference_digit(line: &str) -> bool {
    line.chars()
        .any(|c| c.is_ascii_digit() || is_superscript_digit(c))
}

fn is_abstract_or_keywords_label(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("Abstract:") || t.starts_with("Keywords:")
}

/// An author line: a comma plus at least one (superscript) reference digit.
pub fn looks_like_author_line(line: &str) -> bool {
    line.contains(',') && has_reference_digit(line) && !is_abstract_or_keywords_label(line)
}

/// An author line without reference numbers: comma-separated capitalised
/// names, not a date sentence.
pub fn looks_like_unnumbered_author_line(line: &str) -> bool {
    static NAME_AFTER_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*[A-Z]").unwrap());
    let lower = line.to_lowercase();
    line.contains(',')
        && !lower.contains("received")
        && !lower.contains("accepted")
        && !is_abstract_or_keywords_label(line)
        && NAME_AFTER_COMMA.is_match(line)
}

/// Whether the line ends an author block: an affiliation marker, a
/// correspondence label, or an Abstract/Keywords label.
pub fn is_author_block_end(line: &str) -> bool {
    static SECTION: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^\s*(Abstract|Keywords?)\b").unwrap());
    starts_with_marker(line) || is_correspondence_line(line) || SECTION.is_match(line)
}

pub fn is_correspondence_line(line: &str) -> bool {
    line.contains("Correspondence") || line.contains("Corresponding author")
}

/// Whether the line ends a multi-line affiliation regardless of content.
pub fn is_affiliation_boundary(line: &str) -> bool {
    static SECTION: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^\s*(Abstract|Keywords?|INTRODUCTION|BACKGROUND|REFERENCES)\b").unwrap()
    });
    is_correspondence_line(line) || SECTION.is_match(line)
}

/// A standalone body-section heading (METHODS, RESULTS, ...).
pub fn is_body_section_heading(line: &str) -> bool {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^(METHODS|RESULTS|DISCUSSION|REFERENCES|CONCLUSIONS?)$").unwrap()
    });
    RE.is_match(line.trim())
}

/// An all-capitals heading line such as `INTRODUCTION` or
/// `MATERIAL AND METHODS`.
pub fn is_uppercase_heading(line: &str) -> bool {
    let t = line.trim();
    let letters = t.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 5
        && !t.ends_with(':')
        && t.chars().all(|c| !c.is_lowercase() && !c.is_ascii_digit())
}

/// Whether `text` names an institution.
pub fn looks_like_institution(text: &str) -> bool {
    looks_like_institution_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`looks_like_institution`].
pub fn looks_like_institution_with_config(text: &str, config: &ParsingConfig) -> bool {
    if text.chars().count() < config.min_institution_len {
        return false;
    }
    let lower = text.to_lowercase();
    if !config
        .institution_keywords()
        .iter()
        .any(|k| lower.contains(k.as_str()))
    {
        return false;
    }
    !config.institution_denylist().iter().any(|re| re.is_match(&lower))
}

/// Whether `text` can continue an affiliation begun on an earlier line.
pub fn looks_like_institution_continuation(text: &str) -> bool {
    looks_like_institution_continuation_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`looks_like_institution_continuation`].
pub fn looks_like_institution_continuation_with_config(text: &str, config: &ParsingConfig) -> bool {
    if text.is_empty() || text.chars().count() > config.max_continuation_len {
        return false;
    }
    let lower = text.to_lowercase();
    !config.continuation_denylist().iter().any(|re| re.is_match(&lower))
}
