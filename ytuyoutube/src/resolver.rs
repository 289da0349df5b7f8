//! Identifier resolution
//!
//! Turns whatever the user typed (canonical id, channel URL, `@handle`,
//! vanity URL or plain name) into a canonical [`ChannelId`]. Cheap local
//! rules are tried first; only then is a page fetched and scanned.

use crate::client::YouTubeClient;
use crate::models::{ChannelId, Resolution};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static EMBEDDED_CHANNEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)youtube\.com/channel/(UC[0-9A-Za-z_-]{20,})").unwrap());

/// Extracts the id from inputs like `https://youtube.com/channel/UC…/videos`
pub fn embedded_channel_id(raw: &str) -> Option<ChannelId> {
    EMBEDDED_CHANNEL_RE
        .captures(raw)
        .and_then(|cap| cap.get(1))
        .and_then(|m| ChannelId::parse(m.as_str()))
}

/// True when `candidate` is served by the site or one of its subdomains
fn is_on_site(site: &Url, candidate: &Url) -> bool {
    let (Some(site_host), Some(host)) = (site.host_str(), candidate.host_str()) else {
        return false;
    };
    let domain = site_host.trim_start_matches("www.").to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    matches!(candidate.scheme(), "http" | "https")
        && candidate.port() == site.port()
        && (host == domain || host.ends_with(&format!(".{}", domain)))
}

/// Page most likely to carry the channel id of `raw` (already trimmed)
///
/// Only pages of the site itself are ever returned: an input naming another
/// host is treated as a handle.
pub fn candidate_url(site_url: &str, raw: &str) -> String {
    let handle_page = || format!("{}/@{}", site_url, raw);

    if raw.starts_with('@') {
        return format!("{}/{}", site_url, raw);
    }

    let Ok(site) = Url::parse(site_url) else {
        return handle_page();
    };

    let lower = raw.to_ascii_lowercase();
    let (candidate, as_given) = if lower.starts_with("http://") || lower.starts_with("https://") {
        (raw.to_string(), true)
    } else {
        (format!("https://{}", raw), false)
    };

    match Url::parse(&candidate) {
        Ok(url) if is_on_site(&site, &url) => {
            if as_given {
                raw.to_string()
            } else {
                candidate
            }
        }
        _ => handle_page(),
    }
}

impl YouTubeClient {
    /// Resolves raw user input to a canonical channel id
    ///
    /// Never fails: every fault is logged and reported as `None`.
    pub async fn resolve_channel_id(&self, raw: &str) -> Option<ChannelId> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(id) = ChannelId::parse(raw) {
            return Some(id);
        }

        if let Some(id) = embedded_channel_id(raw) {
            return Some(id);
        }

        let url = candidate_url(self.site_url(), raw);
        let html = match self.fetch_page(&url, self.resolve_timeout).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Channel resolution fetch failed for {:?} ({}): {}", raw, url, e);
                return None;
            }
        };

        let id = self.extractor.channel_id(&html);
        if id.is_none() {
            tracing::debug!("No channel id marker found on {}", url);
        }
        id
    }

    /// Cached variant of [`resolve_channel_id`](Self::resolve_channel_id)
    ///
    /// Successful resolutions are stored once per trimmed input and never
    /// change afterwards. Failures are not stored, the next call retries.
    pub async fn ensure_channel_id(&self, raw: &str) -> Option<ChannelId> {
        let key = raw.trim();
        if key.is_empty() {
            return None;
        }

        if let Some(id) = self.channel_ids.get(key).await {
            return Some(id);
        }

        let id = self.resolve_channel_id(key).await?;
        Some(self.channel_ids.put_once(key.to_string(), id).await)
    }

    /// Resolves `raw`, falling back to channel search suggestions
    ///
    /// At most `limit` suggestions are returned. A failing search is treated
    /// as "no suggestion".
    pub async fn resolve_or_suggest(&self, raw: &str, limit: usize) -> Resolution {
        if let Some(id) = self.ensure_channel_id(raw).await {
            return Resolution::Found(id);
        }

        let query = raw.trim();
        if query.is_empty() {
            return Resolution::NotFound;
        }

        match self.search_channels(query, limit).await {
            Ok(candidates) if !candidates.is_empty() => Resolution::Ambiguous(candidates),
            Ok(_) => Resolution::NotFound,
            Err(e) => {
                tracing::debug!("Suggestion search failed for {:?}: {}", query, e);
                Resolution::NotFound
            }
        }
    }
}
