use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where an article comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A local `.pdf`, or a `.txt` holding already-extracted page text.
    Path(PathBuf),
    /// An `http://` or `https://` URL to a PDF.
    Url(String),
}

impl Source {
    /// Classify a command-line argument. Anything that is not an http(s)
    /// URL is taken as a path.
    pub fn parse(input: &str) -> Self {
        let lower = input.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(input.trim().to_string())
        } else {
            Source::Path(PathBuf::from(input))
        }
    }

    /// Whether the source is a pre-extracted text file rather than a PDF.
    pub fn is_text(&self) -> bool {
        match self {
            Source::Path(path) => has_text_extension(path),
            Source::Url(_) => false,
        }
    }
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Source::parse(s))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths() {
        assert_eq!(
            Source::parse("https://revistamedicinamilitara.ro/a.pdf"),
            Source::Url("https://revistamedicinamilitara.ro/a.pdf".into())
        );
        assert_eq!(Source::parse("HTTP://x/a.pdf"), Source::Url("HTTP://x/a.pdf".into()));
        assert_eq!(Source::parse("articles/a.pdf"), Source::Path("articles/a.pdf".into()));
        assert_eq!(Source::parse("ftp-notes.pdf"), Source::Path("ftp-notes.pdf".into()));
    }

    #[test]
    fn text_sources() {
        assert!(Source::parse("page1.TXT").is_text());
        assert!(!Source::parse("page1.pdf").is_text());
        assert!(!Source::parse("https://x/page1.txt").is_text());
    }

    #[test]
    fn display_round_trips_input() {
        assert_eq!(Source::parse("dir/a.pdf").to_string(), "dir/a.pdf");
        assert_eq!(Source::parse("https://x/a.pdf").to_string(), "https://x/a.pdf");
    }
}
