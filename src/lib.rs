//! Mediaserver Core Library
//!
//! Harvests direct download links for every video reachable from a root
//! channel of a media server, persists them as a JSON list, and fetches the
//! listed files in bounded concurrent chunks.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`item`] - Media item classification and display helpers
//! - [`client`] - Remote API trait and its HTTP implementation
//! - [`config`] - Client configuration loading
//! - [`resolver`] - Video item to direct link resolution
//! - [`walker`] - Sequential channel tree traversal
//! - [`links`] - Link list persistence
//! - [`download`] - Chunked file fetching

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod download;
pub mod item;
pub mod links;
pub mod resolver;
pub mod walker;

mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use client::{
    ApiError, ChannelContent, ChannelInfo, HttpMediaServerClient, MediaResource, MediaServerApi,
};
pub use config::{ClientConfig, ConfigError, load_client_config};
pub use download::{
    ChunkError, ChunkedFetcher, DEFAULT_CHUNK_SIZE, DEFAULT_LINKS_FILE, FetchError, FetchStats,
    FileFetcher, HttpFileFetcher,
};
pub use item::{ClassifyError, Item, ItemKind, classify, describe, sanitized_prefix};
pub use links::{DownloadLinkEntry, PersistenceError, load_links, save_links};
pub use resolver::{LinkResolver, ResolutionError, select_best_resource};
pub use walker::{ChannelWalker, DEFAULT_PACING_DELAY, TraversalError, TraversalReport};
