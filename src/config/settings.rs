//! Connection settings for the photo service.
//!
//! The base URL is normalized once here, before any client exists: a missing
//! scheme or plain `http` becomes `https`.

use reqwest::Url;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Settings handed to the album client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Normalized service base URL, without a trailing slash.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Creates settings from user input, normalizing the URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the API key is empty.
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }

        Ok(Self {
            base_url: normalize_base_url(url)?,
            api_key: api_key.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Normalizes a service URL to `https` with no trailing slash.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed, has no host, or uses a
/// scheme other than `http`/`https`.
pub fn normalize_base_url(raw: &str) -> std::result::Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid_url(raw, "URL is empty"));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        debug!("No scheme in {trimmed}, assuming https");
        format!("https://{trimmed}")
    };

    let mut url =
        Url::parse(&candidate).map_err(|e| ConfigError::invalid_url(raw, e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            info!("Switching {trimmed} to https");
            url.set_scheme("https")
                .map_err(|()| ConfigError::invalid_url(raw, "cannot switch scheme to https"))?;
        }
        other => {
            return Err(ConfigError::invalid_url(
                raw,
                format!("unsupported scheme '{other}', expected http or https"),
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::invalid_url(raw, "URL has no host"));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
