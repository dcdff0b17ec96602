use regex::RegexBuilder;
use rjmm_core::text_utils::{clean, fold_diacritics};

use crate::page::skip_blank;
use crate::predicates::is_author_block_end;

/// Title and raw author line as located on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleAuthors {
    pub title: String,
    pub authors: String,
}

impl TitleAuthors {
    /// Fold diacritics and collapse whitespace of the joined parts.
    pub(crate) fn from_parts<S: AsRef<str>>(title: &[S], authors: &[S]) -> Self {
        let join = |parts: &[S]| {
            parts
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<&str>>()
                .join(" ")
        };
        Self {
            title: fold_diacritics(&join(title)),
            authors: fold_diacritics(&join(authors)),
        }
    }
}

/// Locate a caller-supplied title in `text` and take the author lines after it.
///
/// The override is matched case-insensitively with any whitespace between its
/// words. Authors are the non-blank lines following the match, up to an
/// affiliation marker, a correspondence label or an Abstract/Keywords label.
/// Returns `None` when the title is not on the page.
pub fn locate_override(text: &str, title_override: &str) -> Option<TitleAuthors> {
    let normalized = clean(title_override);
    if normalized.is_empty() {
        return None;
    }
    let pattern = regex::escape(&normalized).replace(' ', r"\s+");
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    let m = re.find(text)?;

    let authors: Vec<&str> = text[m.end()..]
        .lines()
        .take_while(|line| !is_author_block_end(line))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    tracing::debug!(authors = authors.len(), "title override located");
    Some(TitleAuthors {
        title: title_override.trim().to_string(),
        authors: fold_diacritics(&authors.join(" ")),
    })
}

/// Title lines from `start` until an author line, then the author lines.
///
/// Blank lines are skipped. The title ends at the first line satisfying
/// `is_author` or an Abstract/Keywords label; authors accumulate (only lines
/// satisfying `is_author`) until the author block ends.
pub(crate) fn title_then_authors(
    lines: &[String],
    start: usize,
    is_author: impl Fn(&str) -> bool,
) -> TitleAuthors {
    let mut i = skip_blank(lines, start);
    let mut title = Vec::new();
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }
        if is_author(line) || line.starts_with("Abstract:") || line.starts_with("Keywords:") {
            break;
        }
        title.push(line);
        i += 1;
    }

    let mut authors = Vec::new();
    while i < lines.len() {
        let line = lines[i].trim();
        if !line.is_empty() {
            if is_author_block_end(line) {
                break;
            }
            if is_author(line) {
                authors.push(line);
            }
        }
        i += 1;
    }

    TitleAuthors::from_parts(&title, &authors)
}
