use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod lookup;
pub mod text_utils;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use lookup::{AuthorLookup, DisabledLookup, HttpAuthorLookup};
pub use text_utils::{clean, fold_diacritics, normalize_name, translate_superscript};

/// A journal layout template, tied to the period in which it was used.
///
/// Derived purely from page content. `Y2024` is the residual tag for pages
/// that carry none of the cues the other templates are recognised by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatTag {
    #[serde(rename = "2014")]
    Y2014,
    #[serde(rename = "2020")]
    Y2020,
    #[serde(rename = "2022")]
    Y2022,
    #[serde(rename = "2023")]
    Y2023,
    #[default]
    #[serde(rename = "2024")]
    Y2024,
    #[serde(rename = "2025")]
    Y2025,
}

impl FormatTag {
    pub const ALL: [FormatTag; 6] = [
        FormatTag::Y2014,
        FormatTag::Y2020,
        FormatTag::Y2022,
        FormatTag::Y2023,
        FormatTag::Y2024,
        FormatTag::Y2025,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Y2014 => "2014",
            FormatTag::Y2020 => "2020",
            FormatTag::Y2022 => "2022",
            FormatTag::Y2023 => "2023",
            FormatTag::Y2024 => "2024",
            FormatTag::Y2025 => "2025",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One author parsed from the author line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub name: String,
    /// Comma-joined affiliation numbers, e.g. `"2,3"`. Empty when the line
    /// carried no reference numbers.
    pub orders: String,
    /// Result of the author-profile lookup; `false` when the lookup failed.
    pub exists: bool,
}

/// A numbered affiliation. Serialized as a `[number, institution]` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct AffiliationEntry {
    pub number: String,
    pub institution: String,
}

impl AffiliationEntry {
    pub fn new(number: impl Into<String>, institution: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            institution: institution.into(),
        }
    }

    /// Numeric value of the marker, used for ordering.
    pub fn sort_key(&self) -> u32 {
        self.number.parse().unwrap_or(u32::MAX)
    }
}

impl From<(String, String)> for AffiliationEntry {
    fn from((number, institution): (String, String)) -> Self {
        Self {
            number,
            institution,
        }
    }
}

impl From<AffiliationEntry> for (String, String) {
    fn from(entry: AffiliationEntry) -> Self {
        (entry.number, entry.institution)
    }
}

/// Metadata extracted from the first page(s) of one article.
///
/// Every field is always present; a field that could not be located is the
/// empty string or the empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleRecord {
    pub format_detected: FormatTag,
    pub doi: String,
    pub title: String,
    pub authors_full: String,
    pub authors: Vec<AuthorEntry>,
    pub affiliations: Vec<AffiliationEntry>,
    pub correspondence_email: String,
    pub correspondence_full: String,
    pub academic_editor: String,
    pub received: String,
    pub revised: String,
    pub accepted: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    pub article_type: String,
    pub issue: String,
    pub year: String,
    pub article_file: String,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid author URL template {0:?}: missing {{slug}} placeholder")]
    InvalidUrlTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tag_serializes_as_year() {
        assert_eq!(serde_json::to_string(&FormatTag::Y2020).unwrap(), "\"2020\"");
        let tag: FormatTag = serde_json::from_str("\"2025\"").unwrap();
        assert_eq!(tag, FormatTag::Y2025);
        assert_eq!(FormatTag::default(), FormatTag::Y2024);
    }

    #[test]
    fn affiliation_serializes_as_pair() {
        let entry = AffiliationEntry::new("2", "University of Bucharest, Romania");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"["2","University of Bucharest, Romania"]"#);
        let back: AffiliationEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn default_record_has_every_key() {
        let value = serde_json::to_value(ArticleRecord::default()).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        for key in [
            "format_detected",
            "doi",
            "title",
            "authors_full",
            "authors",
            "affiliations",
            "correspondence_email",
            "correspondence_full",
            "academic_editor",
            "received",
            "revised",
            "accepted",
            "abstract",
            "keywords",
            "article_type",
            "issue",
            "year",
            "article_file",
        ] {
            assert!(keys.contains(&key), "missing key {key}");
        }
        assert_eq!(obj.len(), 18);
        assert!(obj.values().all(|v| !v.is_null()));
        assert_eq!(obj["authors"], serde_json::json!([]));
        assert_eq!(obj["doi"], serde_json::json!(""));
    }

    #[test]
    fn sort_key_is_numeric() {
        assert!(AffiliationEntry::new("2", "x").sort_key() < AffiliationEntry::new("10", "x").sort_key());
    }
}
