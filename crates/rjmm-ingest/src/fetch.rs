//! PDF retrieval over HTTP with bounded retries.
//!
//! Rate limiting (429), server errors (5xx) and transport failures are
//! retried with exponential backoff; any other non-success status fails at
//! once. A `Retry-After` header in seconds replaces the computed delay,
//! capped at the request timeout.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use rjmm_core::config_file::FetchConfig;

use crate::IngestError;

/// Retry and client settings for [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts, first try included. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each attempt after.
    pub backoff: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 5,
            backoff: Duration::from_secs(3),
            user_agent: concat!("rjmm-extract/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchSettings {
    /// Defaults overlaid with the values present in a `[fetch]` section.
    pub fn from_config(config: &FetchConfig) -> Self {
        let defaults = Self::default();
        Self {
            timeout: config
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
            max_attempts: config.max_retries.unwrap_or(defaults.max_attempts),
            backoff: config
                .backoff_secs
                .map_or(defaults.backoff, Duration::from_secs),
            user_agent: config.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    /// Delay after failed attempt number `attempt` (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Parse a `Retry-After` value given in seconds. HTTP dates are not honoured.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn retry_after(resp: &Response) -> Option<Duration> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}

/// A blocking HTTP client that downloads whole response bodies.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    settings: FetchSettings,
}

impl Fetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(IngestError::Client)?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// GET `url`, retrying transient failures.
    pub fn get(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let delay = self.settings.delay_after(attempt);
            let wait = match self.client.get(url).send() {
                Ok(resp) if resp.status().is_success() => {
                    let body = resp.bytes().map_err(|source| IngestError::Fetch {
                        url: url.to_string(),
                        source,
                    })?;
                    tracing::debug!(url, attempt, bytes = body.len(), "fetched");
                    return Ok(body.to_vec());
                }
                Ok(resp) => {
                    let status = resp.status();
                    if !is_retryable(status) || attempt >= max_attempts {
                        return Err(IngestError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    }
                    let wait = retry_after(&resp)
                        .map_or(delay, |d| d.min(self.settings.timeout));
                    tracing::warn!(url, attempt, %status, wait_secs = wait.as_secs_f64(), "retrying fetch");
                    wait
                }
                Err(source) => {
                    if attempt >= max_attempts {
                        return Err(IngestError::Fetch {
                            url: url.to_string(),
                            source,
                        });
                    }
                    tracing::warn!(url, attempt, error = %source, wait_secs = delay.as_secs_f64(), "retrying fetch");
                    delay
                }
            };
            std::thread::sleep(wait);
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(max_attempts: u32) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(2),
            max_attempts,
            backoff: Duration::ZERO,
            ..FetchSettings::default()
        }
    }

    #[test]
    fn body_returned_on_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/a.pdf")
            .with_status(200)
            .with_body("%PDF-1.7")
            .create();

        let body = Fetcher::new(quick(3))
            .unwrap()
            .get(&format!("{}/a.pdf", server.url()))
            .unwrap();
        assert_eq!(body, b"%PDF-1.7");
        mock.assert();
    }

    #[test]
    fn not_found_is_not_retried() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/missing.pdf")
            .with_status(404)
            .expect(1)
            .create();

        let err = Fetcher::new(quick(5))
            .unwrap()
            .get(&format!("{}/missing.pdf", server.url()))
            .unwrap_err();
        assert!(matches!(err, IngestError::Status { status: 404, .. }));
        mock.assert();
    }

    #[test]
    fn server_errors_retried_until_attempts_run_out() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/busy.pdf")
            .with_status(503)
            .with_header("retry-after", "0")
            .expect(3)
            .create();

        let err = Fetcher::new(quick(3))
            .unwrap()
            .get(&format!("{}/busy.pdf", server.url()))
            .unwrap_err();
        assert!(matches!(err, IngestError::Status { status: 503, .. }));
        mock.assert();
    }

    #[test]
    fn unreachable_host_is_a_fetch_error() {
        let err = Fetcher::new(FetchSettings {
            timeout: Duration::from_millis(500),
            ..quick(2)
        })
        .unwrap()
        .get("http://127.0.0.1:9/a.pdf")
        .unwrap_err();
        assert!(matches!(err, IngestError::Fetch { .. }));
    }

    #[test]
    fn backoff_doubles() {
        let settings = FetchSettings::default();
        assert_eq!(settings.delay_after(1), Duration::from_secs(3));
        assert_eq!(settings.delay_after(2), Duration::from_secs(6));
        assert_eq!(settings.delay_after(4), Duration::from_secs(24));
    }

    #[test]
    fn settings_from_config() {
        let settings = FetchSettings::from_config(&FetchConfig {
            max_retries: Some(2),
            timeout_secs: Some(10),
            ..FetchConfig::default()
        });
        assert_eq!(settings.max_attempts, 2);
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.backoff, Duration::from_secs(3));
    }

    #[test]
    fn retry_after_seconds_only() {
        assert_eq!(parse_retry_after(" 7 "), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
