//! `links` command: walk a channel tree and persist the direct links.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use mediaserver_core::{
    ChannelWalker, HttpMediaServerClient, MediaServerApi, load_client_config, save_links,
};
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::exit_handler;
use crate::cli::LinksArgs;

pub async fn run_links_command(args: &LinksArgs) -> Result<ProcessExit> {
    let config = load_client_config(&args.conf).with_context(|| {
        format!(
            "invalid path or content for configuration file {}",
            args.conf.display()
        )
    })?;
    debug!(server = %config.server_url, timeout = ?config.timeout(), "configuration loaded");

    let client = HttpMediaServerClient::new(&config).context("failed to build API client")?;
    client
        .health_check()
        .await
        .with_context(|| format!("media server {} is not reachable", client.api_base()))?;

    let api: Arc<dyn MediaServerApi> = Arc::new(client);
    let walker = ChannelWalker::new(api).with_pacing_delay(Duration::from_millis(args.pace_ms));

    let entries = match walker.run_traversal(&args.channel).await {
        Ok(entries) => entries,
        Err(error) => return Ok(exit_handler::traversal_failure(&error)),
    };

    save_links(&entries, &args.output)
        .with_context(|| format!("failed to save link list to {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        count = entries.len(),
        "download links gathered successfully"
    );
    Ok(ProcessExit::Success)
}
