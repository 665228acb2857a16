//! Error types for MediaServer API calls.

use thiserror::Error;

/// Errors returned by a [`MediaServerApi`](super::MediaServerApi) implementation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, connection refused, TLS).
    #[error("network error calling {endpoint}: {source}")]
    Network {
        /// API endpoint that was being called.
        endpoint: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the configured client timeout.
    #[error("timeout calling {endpoint}")]
    Timeout {
        /// API endpoint that timed out.
        endpoint: String,
    },

    /// The server rejected the credentials (HTTP 401/403).
    #[error(
        "access denied calling {endpoint} (HTTP {status})\n  Suggestion: check API_KEY in the client configuration and channel permissions"
    )]
    Unauthorized {
        /// API endpoint that was refused.
        endpoint: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// Any other non-success HTTP status.
    #[error("HTTP {status} calling {endpoint}")]
    HttpStatus {
        /// API endpoint that failed.
        endpoint: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// The API answered with `"success": false`.
    #[error("{endpoint} rejected the request: {message}")]
    Rejected {
        /// API endpoint that rejected the call.
        endpoint: String,
        /// Error message reported by the server.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        /// API endpoint whose response could not be decoded.
        endpoint: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured server URL cannot be combined with the endpoint path.
    #[error("invalid API URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Creates a network error, mapping timeouts to [`ApiError::Timeout`].
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.into(),
            }
        } else {
            Self::Network {
                endpoint: endpoint.into(),
                source,
            }
        }
    }

    /// Creates a status error, mapping 401/403 to [`ApiError::Unauthorized`].
    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        if matches!(status, 401 | 403) {
            Self::Unauthorized {
                endpoint: endpoint.into(),
                status,
            }
        } else {
            Self::HttpStatus {
                endpoint: endpoint.into(),
                status,
            }
        }
    }

    /// Creates a rejection error from a `"success": false` payload.
    pub fn rejected(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a decoding error.
    pub fn decode(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            source,
        }
    }
}
