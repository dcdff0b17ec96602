use std::time::Duration;

use rjmm_core::config_file::ConfigFile;
use rjmm_core::lookup::{DEFAULT_AUTHOR_URL_TEMPLATE, DEFAULT_LOOKUP_TIMEOUT};
use rjmm_ingest::FetchSettings;

/// Environment variables that override the config file.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub lookup_url: Option<String>,
    pub lookup_timeout: Option<String>,
    pub no_lookup: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            lookup_url: std::env::var("RJMM_LOOKUP_URL").ok(),
            lookup_timeout: std::env::var("RJMM_LOOKUP_TIMEOUT").ok(),
            no_lookup: std::env::var("RJMM_NO_LOOKUP").ok(),
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSettings {
    pub enabled: bool,
    pub url_template: String,
    pub timeout: Duration,
}

/// Resolve lookup settings: CLI flags > env vars > config file > defaults.
pub fn resolve_lookup(
    no_lookup: bool,
    lookup_url: Option<String>,
    env: &EnvOverrides,
    file: &ConfigFile,
) -> LookupSettings {
    let file = file.lookup.as_ref();

    let enabled = if no_lookup {
        false
    } else if let Some(value) = env.no_lookup.as_deref() {
        !truthy(value)
    } else {
        file.and_then(|l| l.enabled).unwrap_or(true)
    };

    let url_template = lookup_url
        .or_else(|| env.lookup_url.clone())
        .or_else(|| file.and_then(|l| l.url_template.clone()))
        .unwrap_or_else(|| DEFAULT_AUTHOR_URL_TEMPLATE.to_string());

    let timeout = env
        .lookup_timeout
        .as_deref()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or_else(|| file.and_then(|l| l.timeout_secs))
        .map_or(DEFAULT_LOOKUP_TIMEOUT, Duration::from_secs);

    LookupSettings {
        enabled,
        url_template,
        timeout,
    }
}

pub fn fetch_settings(file: &ConfigFile) -> FetchSettings {
    file.fetch
        .as_ref()
        .map(FetchSettings::from_config)
        .unwrap_or_default()
}
