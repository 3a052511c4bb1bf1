//! Harness configuration.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Base URL used when no other source provides one.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8001";

/// Key holding the backend URL in the env-style file.
pub const BASE_URL_KEY: &str = "REACT_APP_BACKEND_URL";

/// Env-style files searched when `BITSAFE_ENV_FILE` is not set.
const ENV_FILE_PATHS: [&str; 3] = ["frontend/.env", "../frontend/.env", ".env"];

/// Harness configuration loaded from environment variables and an env file.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the service under test, without a trailing slash.
    pub base_url: String,

    /// Per-request timeout in seconds (default: 10).
    pub timeout_seconds: u64,

    /// Pause between create and read in persistence checks, in milliseconds
    /// (default: 1000).
    pub settle_delay_ms: u64,

    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl HarnessConfig {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = match var("BITSAFE_BASE_URL") {
            Some(url) => url,
            None => resolve_base_url(var("BITSAFE_ENV_FILE").map(PathBuf::from).as_deref()),
        };

        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout_seconds: parse_or(var("BITSAFE_TIMEOUT_SECONDS"), "BITSAFE_TIMEOUT_SECONDS", 10),
            settle_delay_ms: parse_or(
                var("BITSAFE_SETTLE_DELAY_MS"),
                "BITSAFE_SETTLE_DELAY_MS",
                1000,
            ),
            report_path: var("BITSAFE_REPORT_PATH").map(PathBuf::from),
        }
    }

    /// Use a specific base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the persistence settle delay.
    #[must_use]
    pub fn with_settle_delay_ms(mut self, millis: u64) -> Self {
        self.settle_delay_ms = millis;
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: FALLBACK_BASE_URL.into(),
            timeout_seconds: 10,
            settle_delay_ms: 1000,
            report_path: None,
        }
    }
}

/// Resolve the base URL from `env_file` (or the default search paths),
/// falling back to [`FALLBACK_BASE_URL`].
#[must_use]
pub fn resolve_base_url(env_file: Option<&Path>) -> String {
    let loaded = match env_file {
        Some(path) => load_base_url(path),
        None => find_env_file().and_then(|path| load_base_url(&path)),
    };

    match loaded {
        Ok(url) => {
            tracing::debug!(url = %url, "Loaded base URL from env file");
            url
        }
        Err(err) => {
            tracing::warn!(error = %err, fallback = FALLBACK_BASE_URL, "Using fallback base URL");
            FALLBACK_BASE_URL.to_string()
        }
    }
}

fn find_env_file() -> Result<PathBuf, ConfigError> {
    ENV_FILE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
        .ok_or_else(|| ConfigError::NotFound(ENV_FILE_PATHS.join(", ")))
}

/// Read the base URL key from an env-style file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not define a
/// non-empty value for [`BASE_URL_KEY`].
pub fn load_base_url(path: &Path) -> Result<String, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match parse_env_value(&contents, BASE_URL_KEY) {
        Some(value) if value.is_empty() => Err(ConfigError::EmptyValue {
            key: BASE_URL_KEY.to_string(),
            path: path.to_path_buf(),
        }),
        Some(value) => Ok(value),
        None => Err(ConfigError::MissingKey {
            key: BASE_URL_KEY.to_string(),
            path: path.to_path_buf(),
        }),
    }
}

/// Find `key` in `KEY=value` formatted text. The first definition wins.
#[must_use]
pub fn parse_env_value(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (name, value) = line.split_once('=')?;
        (name.trim() == key).then(|| unquote(value.trim()).to_string())
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn parse_or(value: Option<String>, key: &str, default: u64) -> u64 {
    let Some(raw) = value else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, default, "Ignoring unparseable setting");
        default
    })
}
