//! Scripted [`MediaServerApi`] used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{ApiError, ChannelContent, ChannelInfo, MediaResource, MediaServerApi};
use crate::item::Item;

pub(crate) fn resource(format: &str, file_size: u64, file: &str) -> MediaResource {
    MediaResource {
        format: format.to_string(),
        file_size,
        file: file.to_string(),
    }
}

/// In-memory channel tree with call recording.
///
/// Unknown channels fail metadata lookup; unknown videos have no resources.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    channels: HashMap<String, ChannelInfo>,
    contents: HashMap<String, ChannelContent>,
    resources: HashMap<String, Vec<MediaResource>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub(crate) fn with_channel(
        mut self,
        oid: &str,
        title: &str,
        sub_channels: &[&str],
        leaves: &[&str],
    ) -> Self {
        self.channels
            .insert(oid.to_string(), ChannelInfo::new(oid, title));
        let (videos, photos_groups): (Vec<Item>, Vec<Item>) = leaves
            .iter()
            .map(|leaf| Item::new(*leaf, format!("title {leaf}")))
            .partition(|item| !item.oid.starts_with('p'));
        self.contents.insert(
            oid.to_string(),
            ChannelContent {
                channels: sub_channels
                    .iter()
                    .map(|sub| ChannelInfo::new(*sub, format!("title {sub}")))
                    .collect(),
                videos,
                photos_groups,
            },
        );
        self
    }

    pub(crate) fn with_resources(mut self, oid: &str, resources: Vec<MediaResource>) -> Self {
        self.resources.insert(oid.to_string(), resources);
        self
    }

    /// Makes every API call naming `oid` fail.
    pub(crate) fn with_failing_item(mut self, oid: &str) -> Self {
        self.failing.insert(oid.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check(&self, endpoint: &str, oid: &str) -> Result<(), ApiError> {
        if self.failing.contains(oid) {
            return Err(ApiError::rejected(endpoint, format!("scripted failure for {oid}")));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaServerApi for ScriptedApi {
    async fn fetch_channel_metadata(&self, oid: &str) -> Result<ChannelInfo, ApiError> {
        self.record(format!("channels/get/:{oid}"));
        self.check("channels/get/", oid)?;
        self.channels
            .get(oid)
            .cloned()
            .ok_or_else(|| ApiError::rejected("channels/get/", "Channel not found"))
    }

    async fn fetch_channel_content(
        &self,
        parent_oid: &str,
        mask: &str,
    ) -> Result<ChannelContent, ApiError> {
        self.record(format!("channels/content/:{parent_oid}:{mask}"));
        self.check("channels/content/", parent_oid)?;
        Ok(self.contents.get(parent_oid).cloned().unwrap_or_default())
    }

    async fn list_media_resources(&self, oid: &str) -> Result<Vec<MediaResource>, ApiError> {
        self.record(format!("medias/resources-list/:{oid}"));
        self.check("medias/resources-list/", oid)?;
        Ok(self.resources.get(oid).cloned().unwrap_or_default())
    }

    async fn resolve_download_url(
        &self,
        oid: &str,
        locator: &str,
        redirect: bool,
    ) -> Result<String, ApiError> {
        self.record(format!("download/:{oid}:{locator}:redirect={redirect}"));
        self.check("download/", oid)?;
        Ok(format!("https://cdn.example.com/{oid}/{locator}"))
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        self.record("health".to_string());
        Ok(())
    }
}
