use once_cell::sync::Lazy;
use regex::Regex;
use rjmm_core::text_utils::clean;

/// Received / revised / accepted dates as printed. Never parsed into calendar
/// dates; any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dates {
    pub received: String,
    pub revised: String,
    pub accepted: String,
}

impl Dates {
    fn has_bounds(&self) -> bool {
        !self.received.is_empty() && !self.accepted.is_empty()
    }
}

/// Start of any header label that ends a labeled value on the same line.
static NEXT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Received|Revised|Accepted|Academic Editor|Published)\s*:").unwrap()
});

/// `line` up to the next header label, whitespace-collapsed.
pub(crate) fn cut_at_next_label(line: &str) -> String {
    let end = NEXT_LABEL.find(line).map_or(line.len(), |m| m.start());
    clean(&line[..end])
}

#[derive(Debug, Default)]
struct LabeledField {
    position: Option<usize>,
    value: String,
}

/// First occurrence of each `Received:` / `Revised:` / `Accepted:` label.
///
/// The value is the rest of the label's line, cut at the next label; a label
/// alone on its line takes the next non-blank line.
fn labeled_fields(text: &str) -> [LabeledField; 3] {
    static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(Received|Revised|Accepted)\s*:").unwrap());

    let mut fields: [LabeledField; 3] = Default::default();
    for caps in LABEL.captures_iter(text) {
        let slot = match caps[1].to_lowercase().as_str() {
            "received" => 0,
            "revised" => 1,
            _ => 2,
        };
        if fields[slot].position.is_some() {
            continue;
        }
        let Some(label) = caps.get(0) else { continue };
        let mut rest = text[label.end()..].split('\n');
        let mut value = cut_at_next_label(rest.next().unwrap_or(""));
        if value.is_empty()
            && let Some(next) = rest.find(|l| !l.trim().is_empty())
        {
            value = cut_at_next_label(next);
        }
        fields[slot] = LabeledField {
            position: Some(label.start()),
            value,
        };
    }
    fields
}

/// Extract the article's dates, trying each known layout in turn.
///
/// 1. `Received:` / `Revised:` / `Accepted:` labels, received before accepted.
/// 2. `received on X, [revised on Y,] and accepted for publishing on Z.`
/// 3. The labels in any order (partial results are kept from here on).
/// 4. A loose `received on X ... accepted ... on Y`.
pub fn parse_dates(text: &str) -> Dates {
    static PROSE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?is)received on ([^,]+(?:, \d{4})?),?\s*(?:revised on ([^,]+),\s*)?and accepted for publishing on ([^.]+)\.",
        )
        .unwrap()
    });
    static LOOSE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?is)received on ([^,]+(?:, \d{4})?)[^.]*accepted.*?on ([^.]+)").unwrap()
    });

    let [received, revised, accepted] = labeled_fields(text);
    let labeled = Dates {
        received: received.value,
        revised: revised.value,
        accepted: accepted.value,
    };
    let ordered = matches!(
        (received.position, accepted.position),
        (Some(r), Some(a)) if r < a
    );
    if ordered && labeled.has_bounds() {
        tracing::debug!(?labeled, "dates from labeled fields");
        return labeled;
    }

    if let Some(caps) = PROSE.captures(text) {
        let dates = Dates {
            received: clean(&caps[1]),
            revised: caps.get(2).map(|m| clean(m.as_str())).unwrap_or_default(),
            accepted: clean(&caps[3]),
        };
        tracing::debug!(?dates, "dates from received/accepted sentence");
        return dates;
    }

    if labeled.has_bounds() {
        return labeled;
    }

    if let Some(caps) = LOOSE.captures(text) {
        return Dates {
            received: clean(&caps[1]),
            revised: labeled.revised,
            accepted: clean(&caps[2]),
        };
    }

    labeled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(received: &str, revised: &str, accepted: &str) -> Dates {
        Dates {
            received: received.into(),
            revised: revised.into(),
            accepted: accepted.into(),
        }
    }

    #[test]
    fn test_labels_on_separate_lines() {
        let text = "Received: 21 June 2025\nRevised: 17 August 2025\nAccepted: 28 August 2025\n";
        assert_eq!(
            parse_dates(text),
            dates("21 June 2025", "17 August 2025", "28 August 2025")
        );
    }

    #[test]
    fn test_labels_inline_with_editor() {
        let text = "Academic Editor: Octavian Vasiliu Received: 21 June 2025  Revised: 17 August 2025  Accepted: 28 August 2025";
        assert_eq!(
            parse_dates(text),
            dates("21 June 2025", "17 August 2025", "28 August 2025")
        );
    }

    #[test]
    fn test_label_value_on_next_line() {
        let text = "Received:\n12 March 2024\nAccepted:\n\n2 May 2024";
        assert_eq!(parse_dates(text), dates("12 March 2024", "", "2 May 2024"));
    }

    #[test]
    fn test_prose_sentence() {
        let text = "The article was received on March 2, 2020, and accepted for publishing on April 4, 2020.";
        assert_eq!(parse_dates(text), dates("March 2, 2020", "", "April 4, 2020"));
    }

    #[test]
    fn test_prose_with_revision() {
        let text = "Article received on 3 May 2023, revised on 10 June 2023, and accepted for publishing on 1 July 2023.";
        assert_eq!(
            parse_dates(text),
            dates("3 May 2023", "10 June 2023", "1 July 2023")
        );
    }

    #[test]
    fn test_labels_out_of_order_still_used() {
        let text = "Accepted: 2 May 2024\nReceived: 12 March 2024";
        assert_eq!(parse_dates(text), dates("12 March 2024", "", "2 May 2024"));
    }

    #[test]
    fn test_loose_fallback() {
        let text = "The manuscript was received on 5 May, 2021, accepted later on 6 June.";
        assert_eq!(parse_dates(text), dates("5 May, 2021", "", "6 June"));
    }

    #[test]
    fn test_partial_and_missing() {
        assert_eq!(parse_dates("Received: 1 July 2024\n"), dates("1 July 2024", "", ""));
        assert_eq!(parse_dates("no dates here"), Dates::default());
    }

    #[test]
    fn test_cut_at_next_label() {
        assert_eq!(cut_at_next_label(" Ion Pop  Received: 1 May"), "Ion Pop");
        assert_eq!(cut_at_next_label("1 May 2024 Published: 3 May"), "1 May 2024");
        assert_eq!(cut_at_next_label("1 May 2024"), "1 May 2024");
    }
}
