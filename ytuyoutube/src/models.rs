//! Data models for YouTube channels, profiles and feeds

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical channel identifier pattern (`UC` + at least 20 url-safe chars)
pub static CHANNEL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^UC[0-9A-Za-z_-]{20,}$").unwrap());

// ============================================================================
// Channel identifier
// ============================================================================

/// A canonical YouTube channel identifier (`UCxxxxxxxxxxxxxxxxxxxxxx`)
///
/// Only constructible from a string that matches [`CHANNEL_ID_RE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Parses a canonical identifier, surrounding whitespace ignored
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        CHANNEL_ID_RE.is_match(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Display name used when nothing better is known: `Channel UCabcdef…`
pub fn fallback_title(key: &str) -> String {
    let prefix: String = key.chars().take(8).collect();
    format!("Channel {}…", prefix)
}

// ============================================================================
// Profile
// ============================================================================

/// Display information scraped from a channel page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

// ============================================================================
// Feed
// ============================================================================

/// One entry of a channel's Atom feed
///
/// Every field is optional: a malformed entry still parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub video_id: Option<String>,
    pub title: Option<String>,
    /// RFC 3339 timestamp as found in the feed
    pub published: Option<String>,
    pub page_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl FeedItem {
    /// Calendar date (`YYYY-MM-DD`) of the publication timestamp
    pub fn release_date(&self) -> Option<String> {
        let published = self.published.as_deref()?.trim();
        match chrono::DateTime::parse_from_rfc3339(published) {
            Ok(dt) => Some(dt.format("%Y-%m-%d").to_string()),
            Err(_) => published.get(..10).map(str::to_string),
        }
    }
}

/// A channel's recent uploads, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFeed {
    /// Channel title as announced by the feed
    pub title: Option<String>,
    pub items: Vec<FeedItem>,
}

impl ChannelFeed {
    /// Thumbnail of the most recent upload
    pub fn first_thumbnail(&self) -> Option<&str> {
        self.items.first()?.thumbnail_url.as_deref()
    }
}

// ============================================================================
// Search
// ============================================================================

/// A channel returned by the search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCandidate {
    pub channel_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub subscribers: String,
    pub description: String,
}

/// Outcome of resolving free user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The input designates exactly this channel
    Found(ChannelId),
    /// No direct match, but the search page proposed these channels
    Ambiguous(Vec<ChannelCandidate>),
    NotFound,
}
