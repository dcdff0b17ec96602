use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub lookup: Option<LookupConfig>,
    pub fetch: Option<FetchConfig>,
}

/// `[lookup]`: author-profile existence probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    pub enabled: Option<bool>,
    pub url_template: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[fetch]`: PDF retrieval over HTTP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub backoff_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// Platform config directory path: `<config_dir>/rjmm/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rjmm").join("config.toml"))
}

/// Load config by cascading CWD `.rjmm.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path();
    load_cascade(platform.as_deref(), Path::new(".rjmm.toml"))
}

/// Cascade `local` over `platform`; either file may be missing.
pub fn load_cascade(platform: Option<&Path>, local: &Path) -> ConfigFile {
    let platform = platform.and_then(load_from_path);
    let local = load_from_path(local);

    match (platform, local) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unparsable config file");
            None
        }
    }
}

/// Overlay value if set, else base value.
fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bl, ol) = (base.lookup.as_ref(), overlay.lookup.as_ref());
    let (bf, of) = (base.fetch.as_ref(), overlay.fetch.as_ref());
    ConfigFile {
        lookup: Some(LookupConfig {
            enabled: pick(ol, bl, |l| l.enabled),
            url_template: pick(ol, bl, |l| l.url_template.clone()),
            timeout_secs: pick(ol, bl, |l| l.timeout_secs),
        }),
        fetch: Some(FetchConfig {
            timeout_secs: pick(of, bf, |f| f.timeout_secs),
            max_retries: pick(of, bf, |f| f.max_retries),
            backoff_secs: pick(of, bf, |f| f.backoff_secs),
            user_agent: pick(of, bf, |f| f.user_agent.clone()),
        }),
    }
}
