//! Author-profile existence lookup.
//!
//! The journal site publishes one page per author at a slug derived from the
//! author's name. A lookup answers whether that page exists. Lookups never
//! fail: transport errors and non-success statuses both answer `false`.

use std::time::Duration;

use crate::CoreError;
use crate::text_utils::normalize_name;

/// Profile URL template; `{slug}` is replaced by [`normalize_name`] output.
pub const DEFAULT_AUTHOR_URL_TEMPLATE: &str =
    "https://revistamedicinamilitara.ro/article-author/{slug}/";

/// Per-request timeout for the profile probe.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Answers whether an author already has a profile on the journal site.
pub trait AuthorLookup: Send + Sync {
    fn exists(&self, name: &str) -> bool;
}

impl<F> AuthorLookup for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, name: &str) -> bool {
        self(name)
    }
}

/// A lookup that never touches the network and always answers `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLookup;

impl AuthorLookup for DisabledLookup {
    fn exists(&self, _name: &str) -> bool {
        false
    }
}

/// HEAD-request probe against the author-profile URL template.
#[derive(Debug, Clone)]
pub struct HttpAuthorLookup {
    client: reqwest::blocking::Client,
    url_template: String,
}

impl HttpAuthorLookup {
    /// Probe the journal site with the default template and timeout.
    pub fn new() -> Result<Self, CoreError> {
        Self::with_settings(DEFAULT_AUTHOR_URL_TEMPLATE, DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_settings(url_template: &str, timeout: Duration) -> Result<Self, CoreError> {
        if !url_template.contains("{slug}") {
            return Err(CoreError::InvalidUrlTemplate(url_template.to_string()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rjmm-extract/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.to_string(),
        })
    }

    /// Profile URL for `name`, or `None` when the name has no usable slug.
    pub fn profile_url(&self, name: &str) -> Option<String> {
        let slug = normalize_name(name);
        if slug.is_empty() {
            return None;
        }
        Some(self.url_template.replace("{slug}", &slug))
    }
}

impl AuthorLookup for HttpAuthorLookup {
    fn exists(&self, name: &str) -> bool {
        let Some(url) = self.profile_url(name) else {
            return false;
        };
        match self.client.head(&url).send() {
            Ok(resp) => {
                let found = resp.status().is_success();
                tracing::debug!(author = name, %url, status = %resp.status(), found, "author lookup");
                found
            }
            Err(err) => {
                tracing::warn!(author = name, %url, error = %err, "author lookup failed");
                false
            }
        }
    }
}
