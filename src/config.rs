//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_AUTOSAVE_QUIET_MS: u64 = 2000;
pub const DEFAULT_NOTIFICATION_MS: u64 = 3000;

/// Errors building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL is not an absolute `http`/`https` URL.
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Quiet period after the last text edit before an auto-save fires.
    pub autosave_quiet: Duration,
    /// How long a notification stays on screen.
    pub notification_ttl: Duration,
    /// Raw `Cookie` header forwarded with every request, if set.
    pub session_cookie: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            autosave_quiet: Duration::from_millis(DEFAULT_AUTOSAVE_QUIET_MS),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `DIARY_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `DIARY_REQUEST_TIMEOUT_SECS`: default 30
    /// - `DIARY_CONNECT_TIMEOUT_SECS`: default 10
    /// - `DIARY_AUTOSAVE_QUIET_MS`: default 2000
    /// - `DIARY_NOTIFICATION_MS`: default 3000
    /// - `DIARY_SESSION_COOKIE`: forwarded verbatim as the `Cookie` header
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `DIARY_BASE_URL` is not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("DIARY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let session_cookie = std::env::var("DIARY_SESSION_COOKIE")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            request_timeout: Duration::from_secs(env_parse("DIARY_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(env_parse("DIARY_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)),
            autosave_quiet: Duration::from_millis(env_parse("DIARY_AUTOSAVE_QUIET_MS", DEFAULT_AUTOSAVE_QUIET_MS)),
            notification_ttl: Duration::from_millis(env_parse("DIARY_NOTIFICATION_MS", DEFAULT_NOTIFICATION_MS)),
            session_cookie,
        })
    }

    /// Same as `self` but pointed at another server.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an absolute http(s) URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(url)?;
        Ok(self)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Validate a server origin and strip trailing slashes.
///
/// # Errors
///
/// Returns an error if `raw` is not an absolute http(s) URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { url: raw.to_owned(), reason };
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", parsed.scheme())));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
