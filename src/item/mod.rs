//! Media item classification and display helpers.
//!
//! Every object exposed by the MediaServer API carries an `oid` whose first
//! character encodes its kind (`v`ideo, `l`ive, `p`hoto group, `c`hannel).
//! This module maps that prefix to [`ItemKind`] and derives the log summary
//! and filesystem-safe prefix used elsewhere in the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of title characters shown by [`describe`].
pub const DESCRIBE_TITLE_CHARS: usize = 40;

/// Maximum number of title characters kept by [`sanitized_prefix`].
pub const PREFIX_TITLE_CHARS: usize = 57;

/// Character substituted for path separators in [`sanitized_prefix`].
pub const SEPARATOR_SUBSTITUTE: char = '|';

/// Semantic kind of a MediaServer object, derived from its identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// On-demand video (`v…`).
    Video,
    /// Live stream (`l…`).
    Live,
    /// Photo group (`p…`).
    PhotoGroup,
    /// Channel container (`c…`).
    Channel,
}

impl ItemKind {
    /// Returns the label used in item summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Live => "live",
            Self::PhotoGroup => "photos",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier prefix did not match any known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The first character of the identifier is not one of `v`, `l`, `p`, `c`.
    #[error("unknown object kind for identifier '{oid}'")]
    UnknownKind {
        /// The identifier that failed classification.
        oid: String,
    },
}

/// A leaf or container entry as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Object identifier; the first character encodes the kind.
    pub oid: String,
    /// Human readable title.
    #[serde(default)]
    pub title: String,
}

impl Item {
    /// Creates an item from an identifier and title.
    #[must_use]
    pub fn new(oid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            title: title.into(),
        }
    }

    /// Classifies this item by its identifier prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::UnknownKind`] when the prefix is not recognized.
    pub fn kind(&self) -> Result<ItemKind, ClassifyError> {
        classify(&self.oid)
    }
}

/// Maps an identifier's first character to its [`ItemKind`].
///
/// # Errors
///
/// Returns [`ClassifyError::UnknownKind`] for any other prefix, including an
/// empty identifier.
pub fn classify(oid: &str) -> Result<ItemKind, ClassifyError> {
    match oid.chars().next() {
        Some('v') => Ok(ItemKind::Video),
        Some('l') => Ok(ItemKind::Live),
        Some('p') => Ok(ItemKind::PhotoGroup),
        Some('c') => Ok(ItemKind::Channel),
        _ => Err(ClassifyError::UnknownKind {
            oid: oid.to_string(),
        }),
    }
}

/// Returns a one-line summary: `<kind> <oid> "<title>"`.
///
/// Titles longer than [`DESCRIBE_TITLE_CHARS`] characters are cut and
/// suffixed with `...`. Unknown prefixes are labelled `unknown`.
#[must_use]
pub fn describe(item: &Item) -> String {
    let kind = item.kind().map_or("unknown", |kind| kind.as_str());
    let mut title: String = item.title.chars().take(DESCRIBE_TITLE_CHARS).collect();
    if item.title.chars().count() > DESCRIBE_TITLE_CHARS {
        title.push_str("...");
    }
    format!("{kind} {} \"{title}\"", item.oid)
}

/// Builds an ASCII, separator-free filename prefix: `<title> - <oid>`.
///
/// The title is cut to [`PREFIX_TITLE_CHARS`] characters, trimmed, and
/// transliterated; `/` and `\` become [`SEPARATOR_SUBSTITUTE`].
///
/// This is a library helper for callers that want ASCII, oid-tagged names.
/// The `fetch` pipeline does not use it: saved files keep their Unicode
/// titles and go through the fetcher's own sanitization.
///
/// # Examples
///
/// ```
/// use mediaserver_core::{Item, sanitized_prefix};
///
/// let item = Item::new("v1a2b", "Café / Ölmühle");
/// assert_eq!(sanitized_prefix(&item), "Cafe | Olmuhle - v1a2b");
/// ```
#[must_use]
pub fn sanitized_prefix(item: &Item) -> String {
    let head: String = item.title.chars().take(PREFIX_TITLE_CHARS).collect();
    let folded = deunicode::deunicode(head.trim());
    let safe: String = folded
        .chars()
        .map(|c| match c {
            '/' | '\\' => SEPARATOR_SUBSTITUTE,
            c => c,
        })
        .collect();
    let oid: String = item
        .oid
        .chars()
        .map(|c| match c {
            '/' | '\\' => SEPARATOR_SUBSTITUTE,
            c => c,
        })
        .collect();
    format!("{safe} - {oid}")
}
