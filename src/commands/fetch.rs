//! `fetch` command: download a saved link list in chunks.

use std::sync::Arc;

use anyhow::{Context, Result};
use mediaserver_core::{ChunkedFetcher, HttpFileFetcher, load_links};
use tracing::info;

use crate::ProcessExit;
use crate::app::exit_handler;
use crate::cli::FetchArgs;

pub async fn run_fetch_command(args: &FetchArgs) -> Result<ProcessExit> {
    let entries = load_links(&args.links)
        .with_context(|| format!("failed to load link list {}", args.links.display()))?;
    info!(count = entries.len(), path = %args.links.display(), "link list loaded");

    let fetcher =
        HttpFileFetcher::new(args.output_dir.clone()).context("failed to build HTTP client")?;
    let output_dir = fetcher.output_dir().to_path_buf();
    let chunked = ChunkedFetcher::new(Arc::new(fetcher), usize::from(args.chunk_size))?;
    let stats = chunked.fetch_all(&entries, args.start_chunk).await?;

    Ok(exit_handler::determine_fetch_outcome(&stats, &output_dir))
}
