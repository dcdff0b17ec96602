use rjmm_core::text_utils::expand_ligatures;

/// Linearized text of an article's leading page(s).
///
/// Holds both the full text (for pattern searches) and its line sequence
/// (for positional heuristics). Ligatures are expanded and carriage returns
/// and form feeds are treated as line breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    text: String,
    lines: Vec<String>,
}

impl PageText {
    pub fn new(raw: &str) -> Self {
        let text = expand_ligatures(raw)
            .replace("\r\n", "\n")
            .replace(['\r', '\x0c', '\x0b'], "\n");
        let lines = text.lines().map(str::to_string).collect();
        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line `index`, or `""` past the end.
    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the first line whose trimmed text satisfies `pred`.
    pub fn position(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        self.lines.iter().position(|l| pred(l.trim()))
    }
}

/// Index of the first non-blank line at or after `from`.
pub(crate) fn skip_blank<S: AsRef<str>>(lines: &[S], mut from: usize) -> usize {
    while from < lines.len() && lines[from].as_ref().trim().is_empty() {
        from += 1;
    }
    from
}
