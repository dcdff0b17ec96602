use once_cell::sync::Lazy;
use regex::Regex;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Substrings (matched against lower-cased text) that mark a line as naming
/// an institution.
pub(crate) const INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "hospital",
    "college",
    "institute",
    "school",
    "department",
    "faculty",
    "center",
    "centre",
    "clinic",
    "medical",
    "emergency",
    "bucuresti",
    "bucharest",
    "romania",
    "timisoara",
    "cluj",
    "iasi",
    "universit",
    "spital",
    "clinica",
    "facultat",
    "haifa",
    "israel",
];

/// Body-text patterns that disqualify an institution candidate.
pub(crate) static INSTITUTION_DENYLIST: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+\s+(week|month|day|year|hour)s?",
        r"postoperatively",
        r"preoperatively",
        r"mg/body",
        r"pmid:",
        r"doi:",
        r"figure \d+",
        r"table \d+",
        r"play a crucial role",
        r"onset and metastasis",
        r"\[\d+\]",
        r"has become an important",
        r"as a direct consequence",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Body-text patterns that end a multi-line affiliation.
pub(crate) static CONTINUATION_DENYLIST: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+\s+(week|month|day|year|hour)s?",
        r"postoperatively",
        r"preoperatively",
        r"mg/body",
        r"pmid:",
        r"doi:",
        r"figure \d+",
        r"table \d+",
        r"^\d+\.",
        r"collection\s+was\s+performed",
        r"histological\s+sections",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Standalone article-type labels printed above the title.
pub(crate) const ARTICLE_TYPE_LABELS: &[&str] = &[
    "ARTICLE",
    "CLINICAL PRACTICE",
    "COMMENTARY",
    "COMMUNICATION",
    "LETTER",
    "LITERATURE REVIEW",
    "NARRATIVE REVIEW",
    "ORIGINAL ARTICLE",
    "ORIGINAL ARTICLES",
    "ORIGINAL RESEARCH",
    "REVIEW",
    "REVIEW ARTICLE",
    "SYSTEMATIC REVIEW",
    "CASE REPORT",
    "EDITORIAL",
    "VARIA",
    "SHORT COMMUNICATION",
];

/// Tokens whose presence means the "abstract" scan ran into body text.
pub(crate) const ABSTRACT_REJECT_TOKENS: &[&str] = &["pmid:", "doi:", "figure", "table"];

/// Configuration for first-page field extraction.
///
/// List fields follow [`ListOverride`] semantics against the built-in
/// defaults. Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── predicates.rs ──
    /// Keywords, one of which an institution line must contain.
    pub(crate) institution_keywords: ListOverride<String>,
    /// Patterns (applied to lower-cased text) that reject an institution.
    pub(crate) institution_denylist: ListOverride<Regex>,
    /// Patterns (applied to lower-cased text) that reject a continuation line.
    pub(crate) continuation_denylist: ListOverride<Regex>,
    /// Minimum character count for an institution candidate (default: 10).
    pub(crate) min_institution_len: usize,
    /// Maximum character count for a continuation line (default: 200).
    pub(crate) max_continuation_len: usize,

    // ── affiliations.rs ──
    /// An assembled affiliation must be strictly longer than this (default: 10).
    pub(crate) min_affiliation_len: usize,

    // ── layouts / sections.rs ──
    /// Standalone article-type labels recognised above the title.
    pub(crate) article_type_labels: ListOverride<String>,

    // ── sections.rs ──
    /// Abstract length bounds, exclusive (default: 50..5000).
    pub(crate) abstract_min_len: usize,
    pub(crate) abstract_max_len: usize,
    /// Tokens that invalidate a line-scanned abstract.
    pub(crate) abstract_reject_tokens: ListOverride<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            institution_keywords: ListOverride::Default,
            institution_denylist: ListOverride::Default,
            continuation_denylist: ListOverride::Default,
            min_institution_len: 10,
            max_continuation_len: 200,
            min_affiliation_len: 10,
            article_type_labels: ListOverride::Default,
            abstract_min_len: 50,
            abstract_max_len: 5000,
            abstract_reject_tokens: ListOverride::Default,
        }
    }
}

fn owned(defaults: &[&str]) -> Vec<String> {
    defaults.iter().map(|s| s.to_string()).collect()
}

impl ParsingConfig {
    pub(crate) fn institution_keywords(&self) -> Vec<String> {
        self.institution_keywords
            .resolve(&owned(INSTITUTION_KEYWORDS))
    }

    pub(crate) fn institution_denylist(&self) -> Vec<Regex> {
        self.institution_denylist.resolve(&INSTITUTION_DENYLIST)
    }

    pub(crate) fn continuation_denylist(&self) -> Vec<Regex> {
        self.continuation_denylist.resolve(&CONTINUATION_DENYLIST)
    }

    pub(crate) fn article_type_labels(&self) -> Vec<String> {
        self.article_type_labels.resolve(&owned(ARTICLE_TYPE_LABELS))
    }

    pub(crate) fn abstract_reject_tokens(&self) -> Vec<String> {
        self.abstract_reject_tokens
            .resolve(&owned(ABSTRACT_REJECT_TOKENS))
    }

    /// Whether `line` (trimmed, case-insensitive) is one of the configured
    /// article-type labels.
    pub(crate) fn is_article_type_label(&self, line: &str) -> bool {
        let upper = line.trim().to_uppercase();
        !upper.is_empty() && self.article_type_labels().iter().any(|l| *l == upper)
    }

    pub fn min_affiliation_len(&self) -> usize {
        self.min_affiliation_len
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    institution_keywords: ListOverride<String>,
    institution_denylist: ListOverride<String>,
    continuation_denylist: ListOverride<String>,
    min_institution_len: Option<usize>,
    max_continuation_len: Option<usize>,
    min_affiliation_len: Option<usize>,
    article_type_labels: ListOverride<String>,
    abstract_min_len: Option<usize>,
    abstract_max_len: Option<usize>,
    abstract_reject_tokens: ListOverride<String>,
}

/// Push onto an `Extend` override, switching to `Extend` if needed.
fn extend_with(list: &mut ListOverride<String>, value: String) {
    match list {
        ListOverride::Extend(v) => v.push(value),
        _ => *list = ListOverride::Extend(vec![value]),
    }
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Institution keywords ──

    pub fn set_institution_keywords(mut self, keywords: Vec<String>) -> Self {
        self.institution_keywords = ListOverride::Replace(keywords);
        self
    }

    pub fn add_institution_keyword(mut self, keyword: String) -> Self {
        extend_with(&mut self.institution_keywords, keyword.to_lowercase());
        self
    }

    // ── Denylists ──

    pub fn set_institution_denylist(mut self, patterns: Vec<String>) -> Self {
        self.institution_denylist = ListOverride::Replace(patterns);
        self
    }

    pub fn add_institution_denylist_pattern(mut self, pattern: String) -> Self {
        extend_with(&mut self.institution_denylist, pattern);
        self
    }

    pub fn set_continuation_denylist(mut self, patterns: Vec<String>) -> Self {
        self.continuation_denylist = ListOverride::Replace(patterns);
        self
    }

    pub fn add_continuation_denylist_pattern(mut self, pattern: String) -> Self {
        extend_with(&mut self.continuation_denylist, pattern);
        self
    }

    // ── Article-type labels ──

    pub fn add_article_type_label(mut self, label: String) -> Self {
        extend_with(&mut self.article_type_labels, label.to_uppercase());
        self
    }

    // ── Scalars ──

    pub fn min_institution_len(mut self, n: usize) -> Self {
        self.min_institution_len = Some(n);
        self
    }

    pub fn max_continuation_len(mut self, n: usize) -> Self {
        self.max_continuation_len = Some(n);
        self
    }

    pub fn min_affiliation_len(mut self, n: usize) -> Self {
        self.min_affiliation_len = Some(n);
        self
    }

    pub fn abstract_bounds(mut self, min: usize, max: usize) -> Self {
        self.abstract_min_len = Some(min);
        self.abstract_max_len = Some(max);
        self
    }

    pub fn add_abstract_reject_token(mut self, token: String) -> Self {
        extend_with(&mut self.abstract_reject_tokens, token.to_lowercase());
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile_list = |list: ListOverride<String>| -> Result<ListOverride<Regex>, regex::Error> {
            let compile = |patterns: Vec<String>| -> Result<Vec<Regex>, regex::Error> {
                patterns.iter().map(|p| Regex::new(p)).collect()
            };
            Ok(match list {
                ListOverride::Default => ListOverride::Default,
                ListOverride::Replace(patterns) => ListOverride::Replace(compile(patterns)?),
                ListOverride::Extend(patterns) => ListOverride::Extend(compile(patterns)?),
            })
        };

        let defaults = ParsingConfig::default();
        Ok(ParsingConfig {
            institution_keywords: self.institution_keywords,
            institution_denylist: compile_list(self.institution_denylist)?,
            continuation_denylist: compile_list(self.continuation_denylist)?,
            min_institution_len: self
                .min_institution_len
                .unwrap_or(defaults.min_institution_len),
            max_continuation_len: self
                .max_continuation_len
                .unwrap_or(defaults.max_continuation_len),
            min_affiliation_len: self
                .min_affiliation_len
                .unwrap_or(defaults.min_affiliation_len),
            article_type_labels: self.article_type_labels,
            abstract_min_len: self.abstract_min_len.unwrap_or(defaults.abstract_min_len),
            abstract_max_len: self.abstract_max_len.unwrap_or(defaults.abstract_max_len),
            abstract_reject_tokens: self.abstract_reject_tokens,
        })
    }
}
