//! Shared User-Agent strings for API and file transfer HTTP clients.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/mediaserver-dl";

/// Default User-Agent for file transfer requests.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("mediaserver-dl/{version} (media-fetch; +{PROJECT_UA_URL})")
}

/// Default User-Agent for API requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("mediaserver-dl/{version} (api-client; +{PROJECT_UA_URL})")
}
