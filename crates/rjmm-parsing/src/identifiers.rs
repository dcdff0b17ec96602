use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::text_utils::clean;

const EMAIL: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

/// Only a short-form `doi:` within this many bytes of the start anchors the
/// header; later ones belong to the reference list.
const EARLY_DOI_WINDOW: usize = 2000;

static HTTPS_DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://doi\.org/\S+").unwrap());
static SHORT_DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)doi:\s*(\S+)").unwrap());

/// Extract the article DOI as a resolver URL.
///
/// A full `https://doi.org/...` URL is returned verbatim; a bare
/// `doi: 10.x/y` becomes `https://doi.org/10.x/y`.
pub fn extract_doi(text: &str) -> String {
    if let Some(m) = HTTPS_DOI.find(text) {
        return m.as_str().trim().to_string();
    }
    if let Some(caps) = SHORT_DOI.captures(text) {
        return format!("https://doi.org/{}", caps[1].trim());
    }
    String::new()
}

/// The text following the header DOI, or the whole text if there is none.
pub fn content_after_doi(text: &str) -> &str {
    static HTTPS_DOI_TRAILING: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)https?://doi\.org/\S+\s*").unwrap());
    static SHORT_DOI_TRAILING: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)doi:\s*\S+\s*").unwrap());

    if let Some(m) = HTTPS_DOI_TRAILING.find(text) {
        return &text[m.end()..];
    }
    match SHORT_DOI_TRAILING.find(text) {
        Some(m) if m.start() < EARLY_DOI_WINDOW => &text[m.end()..],
        _ => text,
    }
}

/// First e-mail address in `text`.
pub fn first_email(text: &str) -> Option<&str> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL).unwrap());
    RE.find(text).map(|m| m.as_str())
}

/// Labels that introduce the correspondence block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrespondenceLabel {
    /// `Correspondence: Name, e-mail: x@y`
    Correspondence,
    /// `Corresponding author: Name`, e-mail possibly on the next line.
    CorrespondingAuthor,
}

/// Correspondence e-mail and the full labeled text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correspondence {
    pub email: String,
    pub full: String,
}

fn labeled(text: &str, label: CorrespondenceLabel) -> Option<Correspondence> {
    static CORRESPONDENCE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)Correspondence:\s*([^\n\r]+)").unwrap());
    static CORRESPONDING: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"(?i)Corresponding author:\s*([^\n\r]+)(?:\s*\n\s*({EMAIL}))?"
        ))
        .unwrap()
    });

    let re: &Regex = match label {
        CorrespondenceLabel::Correspondence => &*CORRESPONDENCE,
        CorrespondenceLabel::CorrespondingAuthor => &*CORRESPONDING,
    };
    let caps = re.captures(text)?;
    let full = clean(&caps[1]);
    let email = caps
        .get(2)
        .map(|m| m.as_str())
        .or_else(|| first_email(&full))
        .unwrap_or("")
        .to_string();
    Some(Correspondence { email, full })
}

/// Find the correspondence block, trying `labels` in order.
///
/// Falls back to the first e-mail anywhere in the text, with `full` empty.
pub fn extract_correspondence(text: &str, labels: &[CorrespondenceLabel]) -> Correspondence {
    if let Some(found) = labels.iter().find_map(|label| labeled(text, *label)) {
        return found;
    }
    Correspondence {
        email: first_email(text).unwrap_or("").to_string(),
        full: String::new(),
    }
}

/// Whether the text carries any DOI indicator.
pub(crate) fn has_doi_indicator(text: &str) -> bool {
    static SHORT_DOI_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)doi:\s*\d").unwrap());
    HTTPS_DOI.is_match(text) || SHORT_DOI_NUMERIC.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use CorrespondenceLabel::*;

    #[test]
    fn test_extract_doi_https_verbatim() {
        assert_eq!(
            extract_doi("x\nhttps://doi.org/10.55453/rjmm.2025.128.5.1\ny"),
            "https://doi.org/10.55453/rjmm.2025.128.5.1"
        );
        assert_eq!(
            extract_doi("HTTP://DOI.ORG/10.1/ABC"),
            "HTTP://DOI.ORG/10.1/ABC"
        );
    }

    #[test]
    fn test_extract_doi_short_form() {
        assert_eq!(extract_doi("doi: 10.1234/abc"), "https://doi.org/10.1234/abc");
        assert_eq!(extract_doi("DOI:10.1/x\n"), "https://doi.org/10.1/x");
        assert_eq!(extract_doi("no identifier"), "");
    }

    #[test]
    fn test_content_after_doi() {
        assert_eq!(content_after_doi("A\nhttps://doi.org/10.1/x\n\nTitle"), "Title");
        assert_eq!(content_after_doi("A\ndoi: 10.1/x\nTitle"), "Title");
        assert_eq!(content_after_doi("plain"), "plain");

        let late = format!("{}\ndoi: 10.1/x\nrest", "a".repeat(2500));
        assert_eq!(content_after_doi(&late), late);
    }

    #[test]
    fn test_correspondence_line() {
        let c = extract_correspondence(
            "Correspondence: Jane Doe, e-mail: jane@x.org\n",
            &[Correspondence, CorrespondingAuthor],
        );
        assert_eq!(c.email, "jane@x.org");
        assert_eq!(c.full, "Jane Doe, e-mail: jane@x.org");
    }

    #[test]
    fn test_corresponding_author_email_next_line() {
        let text = "Corresponding author: Ion Popescu, MD\n  ion.popescu@umf.ro\nAbstract:";
        let c = extract_correspondence(text, &[CorrespondingAuthor, Correspondence]);
        assert_eq!(c.full, "Ion Popescu, MD");
        assert_eq!(c.email, "ion.popescu@umf.ro");
    }

    #[test]
    fn test_label_order_respected() {
        let text = "Correspondence: a@b.ro\nCorresponding author: Someone, c@d.ro";
        assert_eq!(extract_correspondence(text, &[Correspondence, CorrespondingAuthor]).email, "a@b.ro");
        assert_eq!(extract_correspondence(text, &[CorrespondingAuthor, Correspondence]).email, "c@d.ro");
    }

    #[test]
    fn test_email_fallback() {
        let c = extract_correspondence("contact us at office@rjmm.ro today", &[Correspondence]);
        assert_eq!(c.email, "office@rjmm.ro");
        assert_eq!(c.full, "");
        assert_eq!(extract_correspondence("nothing", &[Correspondence]), super::Correspondence::default());
    }

    #[test]
    fn test_doi_indicator() {
        assert!(has_doi_indicator("doi: 10.1/x"));
        assert!(has_doi_indicator("https://doi.org/10.1/x"));
        assert!(!has_doi_indicator("doi: pending"));
    }
}
