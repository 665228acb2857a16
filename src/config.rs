//! Client configuration loading.
//!
//! The client configuration is a JSON document using the MediaServer client
//! key names. Unknown keys are ignored so an existing client config file can
//! be passed unchanged.
//!
//! ```json
//! {
//!     "SERVER_URL": "https://mediaserver.example.com",
//!     "API_KEY": "s-abc123",
//!     "TIMEOUT": 300
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Lower bound applied to the configured request timeout, in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 120;

/// Errors raised while loading or validating client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or misses required keys.
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        /// Path that was being parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A value is present but out of its accepted range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Connection settings for the MediaServer API client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the MediaServer instance.
    #[serde(rename = "SERVER_URL")]
    pub server_url: String,
    /// API key sent with every request, if any.
    #[serde(rename = "API_KEY", default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(rename = "TIMEOUT", default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether TLS certificates are verified.
    #[serde(rename = "VERIFY_SSL", default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_timeout_secs() -> u64 {
    MIN_TIMEOUT_SECS
}

fn default_verify_ssl() -> bool {
    true
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the server URL.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            verify_ssl: default_verify_ssl(),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Raises the timeout to at least [`MIN_TIMEOUT_SECS`].
    #[must_use]
    pub fn with_timeout_floor(mut self) -> Self {
        if self.timeout_secs < MIN_TIMEOUT_SECS {
            debug!(
                configured = self.timeout_secs,
                floor = MIN_TIMEOUT_SECS,
                "raising request timeout to floor"
            );
            self.timeout_secs = MIN_TIMEOUT_SECS;
        }
        self
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates values against client constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `SERVER_URL` is not an http(s)
    /// URL or `TIMEOUT` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.server_url).map_err(|e| ConfigError::Invalid {
            field: "SERVER_URL",
            reason: format!("'{}' is not a URL: {e}", self.server_url),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "SERVER_URL",
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "TIMEOUT",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.api_key.as_deref().is_some_and(str::is_empty) {
            warn!("API_KEY is set but empty; requests will be anonymous");
        }
        Ok(())
    }
}

/// Loads, validates, and floors the client configuration at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
pub fn load_client_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_client_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config.with_timeout_floor())
}

fn parse_client_config(raw: &str) -> Result<ClientConfig, serde_json::Error> {
    serde_json::from_str(raw)
}
