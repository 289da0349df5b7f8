//! Channel search through the public results page

use crate::client::YouTubeClient;
use crate::error::Result;
use crate::extract::{absolute_url, formatted_text};
use crate::jsonpath::{pluck_array, pluck_str, Index, Key, Last};
use crate::models::ChannelCandidate;
use serde_json::Value;
use url::form_urlencoded::byte_serialize;

/// `sp` filter restricting results to channels (already percent-encoded twice,
/// as the site itself does)
const CHANNEL_FILTER: &str = "EgIQAg%253D%253D";

impl YouTubeClient {
    /// Searches channels matching `query`, keeping at most `limit` results
    ///
    /// A page whose embedded data cannot be found or parsed yields an empty
    /// list. Transport failures are returned as errors.
    pub async fn search_channels(&self, query: &str, limit: usize) -> Result<Vec<ChannelCandidate>> {
        let encoded: String = byte_serialize(query.trim().as_bytes()).collect();
        let url = format!(
            "{}/results?search_query={}&sp={}",
            self.site_url(),
            encoded,
            CHANNEL_FILTER
        );

        let html = self.fetch_page(&url, self.fetch_timeout).await?;

        let Some(data) = self.extractor.initial_data(&html) else {
            tracing::debug!("No ytInitialData on search page for {:?}", query);
            return Ok(Vec::new());
        };

        let mut candidates = parse_search_results(&data);
        candidates.truncate(limit);
        Ok(candidates)
    }
}

/// Collects every `channelRenderer` of a search page's initial data
pub fn parse_search_results(data: &Value) -> Vec<ChannelCandidate> {
    let sections = pluck_array(
        data,
        &[
            Key("contents"),
            Key("twoColumnSearchResultsRenderer"),
            Key("primaryContents"),
            Key("sectionListRenderer"),
            Key("contents"),
        ],
    );

    sections
        .iter()
        .flat_map(|section| pluck_array(section, &[Key("itemSectionRenderer"), Key("contents")]))
        .filter_map(|item| item.get("channelRenderer"))
        .filter_map(channel_candidate)
        .collect()
}

fn channel_candidate(renderer: &Value) -> Option<ChannelCandidate> {
    let channel_id = renderer.get("channelId")?.as_str()?.to_string();
    let title = pluck_str(renderer, &[Key("title"), Key("simpleText")])
        .or_else(|| pluck_str(renderer, &[Key("title"), Key("runs"), Index(0), Key("text")]))
        .filter(|t| !t.is_empty())?
        .to_string();

    if channel_id.is_empty() {
        return None;
    }

    let thumbnail = pluck_str(renderer, &[Key("thumbnail"), Key("thumbnails"), Last, Key("url")])
        .map(absolute_url);
    let subscribers = renderer
        .get("subscriberCountText")
        .and_then(formatted_text)
        .unwrap_or_default();
    let description = pluck_array(renderer, &[Key("descriptionSnippet"), Key("runs")])
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect::<String>();

    Some(ChannelCandidate {
        channel_id,
        title,
        thumbnail,
        subscribers,
        description,
    })
}
