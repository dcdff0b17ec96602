//! Layout classification.
//!
//! Each redesign of the journal changed one or two surface cues: the shape of
//! the DOI, the running volume header, the wording of the received/accepted
//! sentence. No cue is decisive alone, so the tags are tested as an ordered
//! list of signatures and the first match wins.

use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::FormatTag;

use crate::identifiers::has_doi_indicator;

static DOI_2025: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https://doi\.org/10\.55453/rjmm\.2025\.").unwrap());

static VOLUME_2014: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Vol\.\s+[IVXLC]+.*?No\.\s*[\d\-]+/2014").unwrap());
static ACCEPTED_2014: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:The )?article (?:was )?received on .+accepted for publishing on .+(?:2013|2014)\.")
        .unwrap()
});

static VOLUME_2020: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Vol\.\s+[IVXLC]+.*?/2020").unwrap());
static ACCEPTED_2020: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:The )?article (?:was )?received on .+accepted for publishing on .+(?:2019|2020)\.")
        .unwrap()
});

static SHORT_DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)doi:\s*\d").unwrap());
static JOURNAL_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Vol\.\s+[IVXLC]+.*Romanian Journal").unwrap());
static CORRESPONDING_AUTHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Corresponding author:").unwrap());
static RECEIVED_SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)The article was received on [^,]+, \d{4}, and accepted for publishing on [^.]+\.",
    )
    .unwrap()
});

/// Classify page text into a layout tag. Total: unrecognised text is `Y2024`.
pub fn classify(text: &str) -> FormatTag {
    let tag = signature(text);
    tracing::debug!(tag = %tag, "layout classified");
    tag
}

fn signature(text: &str) -> FormatTag {
    if DOI_2025.is_match(text) {
        return FormatTag::Y2025;
    }

    let no_doi = !has_doi_indicator(text);
    if VOLUME_2014.is_match(text) || (no_doi && ACCEPTED_2014.is_match(text)) {
        return FormatTag::Y2014;
    }
    if VOLUME_2020.is_match(text) || (no_doi && ACCEPTED_2020.is_match(text)) {
        return FormatTag::Y2020;
    }

    if SHORT_DOI.is_match(text) {
        return FormatTag::Y2022;
    }

    if JOURNAL_HEADER.is_match(text) {
        return if CORRESPONDING_AUTHOR.is_match(text) {
            FormatTag::Y2022
        } else {
            FormatTag::Y2023
        };
    }

    if no_doi && RECEIVED_SENTENCE.is_match(text) {
        return FormatTag::Y2022;
    }

    FormatTag::Y2024
}

/// Whether the layout continues its header fields onto the second page.
pub fn needs_second_page(tag: FormatTag) -> bool {
    tag == FormatTag::Y2020
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2025_doi_wins() {
        let text = "Vol. CXXVIII • No. 5/2025 • Romanian Journal of Military Medicine\n\
                    https://doi.org/10.55453/rjmm.2025.128.5.1\nCorresponding author: x";
        assert_eq!(classify(text), FormatTag::Y2025);
    }

    #[test]
    fn test_2014_volume_header() {
        assert_eq!(classify("Vol. CXVII • No. 3-4/2014 • RJMM"), FormatTag::Y2014);
    }

    #[test]
    fn test_2014_sentence_requires_no_doi() {
        let sentence = "Article received on January 5, 2014 and accepted for publishing on February 10, 2014.";
        assert_eq!(classify(sentence), FormatTag::Y2014);
        let with_doi = format!("{sentence}\ndoi: 10.1/x");
        assert_eq!(classify(&with_doi), FormatTag::Y2022);
    }

    #[test]
    fn test_2014_sentence_needs_closing_period() {
        let unfinished = "Article received on January 5, 2014 and accepted for publishing on February 10, 2014 in";
        assert_eq!(classify(unfinished), FormatTag::Y2024);
    }

    #[test]
    fn test_2020_cues() {
        assert_eq!(classify("Vol. CXXIII • No. 1/2020"), FormatTag::Y2020);
        assert_eq!(
            classify("The article was received on March 2, 2020, and accepted for publishing on April 4, 2020."),
            FormatTag::Y2020
        );
    }

    #[test]
    fn test_short_doi_is_2022() {
        assert_eq!(classify("doi: 10.55453/rjmm.2022.125.1.5"), FormatTag::Y2022);
    }

    #[test]
    fn test_journal_header_split() {
        let header = "Vol. CXXV • No. 2/2022 • Romanian Journal of Military Medicine";
        assert_eq!(
            classify(&format!("{header}\nCorresponding author: Ion Pop")),
            FormatTag::Y2022
        );
        assert_eq!(
            classify(&format!("{header}\nCorrespondence: a@b.ro")),
            FormatTag::Y2023
        );
    }

    #[test]
    fn test_received_sentence_is_2022() {
        let text = "The article was received on July 7, 2021, and accepted for publishing on August 1, 2021.";
        assert_eq!(classify(text), FormatTag::Y2022);
    }

    #[test]
    fn test_default_is_2024() {
        assert_eq!(classify(""), FormatTag::Y2024);
        assert_eq!(classify("plain text without any cue"), FormatTag::Y2024);
        assert_eq!(classify("https://doi.org/10.55453/rjmm.2024.127.1.2"), FormatTag::Y2024);
    }

    #[test]
    fn test_second_page_only_for_2020() {
        assert!(needs_second_page(FormatTag::Y2020));
        assert!(FormatTag::ALL
            .iter()
            .filter(|t| **t != FormatTag::Y2020)
            .all(|t| !needs_second_page(*t)));
    }
}
