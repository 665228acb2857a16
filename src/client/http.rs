//! reqwest-backed MediaServer API client.
//!
//! Endpoints live under `{SERVER_URL}/api/v2/`. Every response is a JSON
//! object carrying a `success` flag; `"success": false` is reported as
//! [`ApiError::Rejected`] with the server's `error` message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ChannelContent, ChannelInfo, MediaResource, MediaServerApi};
use crate::config::ClientConfig;
use crate::user_agent;

const API_PREFIX: &str = "api/v2/";
const CONNECT_TIMEOUT_SECS: u64 = 10;

const ENDPOINT_CHANNEL_GET: &str = "channels/get/";
const ENDPOINT_CHANNEL_CONTENT: &str = "channels/content/";
const ENDPOINT_RESOURCES_LIST: &str = "medias/resources-list/";
const ENDPOINT_DOWNLOAD: &str = "download/";

#[derive(Deserialize)]
struct ChannelGetResponse {
    info: ChannelInfo,
}

#[derive(Deserialize)]
struct ResourcesListResponse {
    #[serde(default)]
    resources: Vec<MediaResource>,
}

#[derive(Deserialize)]
struct DownloadResponse {
    url: String,
}

/// MediaServer API client over HTTP.
///
/// Create once per run; the underlying reqwest client pools connections.
#[derive(Debug, Clone)]
pub struct HttpMediaServerClient {
    client: Client,
    api_base: Url,
    api_key: Option<String>,
}

impl HttpMediaServerClient {
    /// Builds a client from validated configuration.
    ///
    /// The configured timeout is used as-is; apply
    /// [`ClientConfig::with_timeout_floor`] beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for an unusable `SERVER_URL` and
    /// [`ApiError::Client`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let api_base = api_base_url(&config.server_url)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout())
            .user_agent(user_agent::default_api_user_agent())
            .danger_accept_invalid_certs(!config.verify_ssl)
            .gzip(true)
            .build()
            .map_err(|source| ApiError::Client { source })?;

        debug!(
            api_base = %api_base,
            timeout_secs = config.timeout_secs,
            verify_ssl = config.verify_ssl,
            "created MediaServer API client"
        );

        Ok(Self {
            client,
            api_base,
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        })
    }

    /// Returns the API root every endpoint is joined onto.
    #[must_use]
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self
            .api_base
            .join(endpoint)
            .map_err(|_| ApiError::InvalidUrl {
                url: format!("{}{endpoint}", self.api_base),
            })?;
        if !params.is_empty() || self.api_key.is_some() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                query.append_pair("api_key", api_key);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint_url(endpoint, params)?;
        debug!(endpoint, "calling MediaServer API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(endpoint, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))?;
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| ApiError::decode(endpoint, e))?;
        check_success(endpoint, &value)?;
        serde_json::from_value(value).map_err(|e| ApiError::decode(endpoint, e))
    }
}

/// Normalizes `SERVER_URL` into the `/api/v2/` root.
fn api_base_url(server_url: &str) -> Result<Url, ApiError> {
    let trimmed = server_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash)
        .and_then(|base| base.join(API_PREFIX))
        .map_err(|_| ApiError::InvalidUrl {
            url: server_url.to_string(),
        })
}

fn check_success(endpoint: &str, value: &Value) -> Result<(), ApiError> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("no error message");
        return Err(ApiError::rejected(endpoint, message));
    }
    Ok(())
}

#[async_trait]
impl MediaServerApi for HttpMediaServerClient {
    #[instrument(skip(self))]
    async fn fetch_channel_metadata(&self, oid: &str) -> Result<ChannelInfo, ApiError> {
        let response: ChannelGetResponse = self
            .get_json(ENDPOINT_CHANNEL_GET, &[("oid", oid)])
            .await?;
        Ok(response.info)
    }

    #[instrument(skip(self))]
    async fn fetch_channel_content(
        &self,
        parent_oid: &str,
        mask: &str,
    ) -> Result<ChannelContent, ApiError> {
        self.get_json(
            ENDPOINT_CHANNEL_CONTENT,
            &[("parent_oid", parent_oid), ("content", mask)],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_media_resources(&self, oid: &str) -> Result<Vec<MediaResource>, ApiError> {
        let response: ResourcesListResponse = self
            .get_json(ENDPOINT_RESOURCES_LIST, &[("oid", oid)])
            .await?;
        Ok(response.resources)
    }

    #[instrument(skip(self, locator))]
    async fn resolve_download_url(
        &self,
        oid: &str,
        locator: &str,
        redirect: bool,
    ) -> Result<String, ApiError> {
        let redirect = if redirect { "yes" } else { "no" };
        let response: DownloadResponse = self
            .get_json(
                ENDPOINT_DOWNLOAD,
                &[("oid", oid), ("url", locator), ("redirect", redirect)],
            )
            .await?;
        Ok(response.url)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), ApiError> {
        let _: Value = self.get_json("", &[]).await?;
        Ok(())
    }
}
