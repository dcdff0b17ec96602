use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Superscript digit glyphs, in value order.
pub const SUPERSCRIPT_DIGITS: &str = "⁰¹²³⁴⁵⁶⁷⁸⁹";

/// Map a superscript digit glyph to its ASCII digit.
pub fn superscript_to_digit(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        _ => None,
    }
}

pub fn is_superscript_digit(c: char) -> bool {
    superscript_to_digit(c).is_some()
}

/// Replace superscript digits with ASCII digits, leaving everything else alone.
pub fn translate_superscript(s: &str) -> String {
    s.chars()
        .map(|c| superscript_to_digit(c).unwrap_or(c))
        .collect()
}

/// Collapse whitespace runs (including non-breaking spaces) and trim.
pub fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compatibility-decompose, drop combining marks, then [`clean`].
///
/// Superscript digits decompose to plain digits here as well.
pub fn fold_diacritics(s: &str) -> String {
    let folded: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    clean(&folded)
}

/// Build the URL slug for an author's profile page.
///
/// `"Ștefan  Ionescu-Pop"` → `"stefan-ionescu-pop"`; `"A. B. Smith"` → `"a-b-smith"`.
pub fn normalize_name(name: &str) -> String {
    static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s.]+").unwrap());
    static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\-]").unwrap());
    static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

    let stripped: String = name
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let hyphenated = SEPARATORS.replace_all(&stripped, "-");
    let filtered = DISALLOWED.replace_all(&hyphenated, "");
    HYPHEN_RUNS
        .replace_all(&filtered, "-")
        .trim_matches('-')
        .to_string()
}

/// Expand typographic ligatures that PDF text layers emit as single glyphs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}
