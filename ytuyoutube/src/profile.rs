//! Channel profile scraping (display name and avatar)

use crate::client::YouTubeClient;
use crate::extract::{absolute_url, PageExtractor};
use crate::jsonpath::{pluck_array, Key};
use crate::models::{fallback_title, ChannelId, ChannelProfile};
use serde_json::Value;

impl YouTubeClient {
    /// Display name and avatar of a channel
    ///
    /// Profiles are cached once fetched. A transport fault or non-2xx answer
    /// returns `None` and nothing is cached, so a later call retries.
    pub async fn fetch_channel_profile(&self, id: &ChannelId) -> Option<ChannelProfile> {
        if let Some(profile) = self.profiles.get(id.as_str()).await {
            return Some(profile);
        }

        let url = self.channel_url(id);
        let html = match self.fetch_page(&url, self.fetch_timeout).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Profile fetch failed for {}: {}", id, e);
                return None;
            }
        };

        let profile = parse_channel_profile(self.extractor.as_ref(), &html, id);
        Some(self.profiles.put_once(id.to_string(), profile).await)
    }
}

/// Builds a profile from a channel page
///
/// The `og:` meta tags come first. Without `og:image` the avatar is taken
/// from the initial data.
pub fn parse_channel_profile(
    extractor: &dyn PageExtractor,
    html: &str,
    id: &ChannelId,
) -> ChannelProfile {
    let mut meta = extractor
        .meta_properties(html, &["og:title", "og:image"])
        .into_iter();
    let title = meta.next().flatten();
    let image = meta.next().flatten();

    let display_name = title.unwrap_or_else(|| fallback_title(id.as_str()));

    let avatar_url = image
        .or_else(|| extractor.initial_data(html).and_then(|data| best_avatar(&data)))
        .map(|url| absolute_url(&url));

    ChannelProfile {
        display_name,
        avatar_url,
    }
}

/// Highest-resolution avatar listed in a channel page's initial data
///
/// Looks at the classic `c4TabbedHeaderRenderer` first, then at the newer
/// `pageHeaderRenderer` view model.
pub fn best_avatar(data: &Value) -> Option<String> {
    let classic = pluck_array(
        data,
        &[
            Key("header"),
            Key("c4TabbedHeaderRenderer"),
            Key("avatar"),
            Key("thumbnails"),
        ],
    );
    let modern = pluck_array(
        data,
        &[
            Key("header"),
            Key("pageHeaderRenderer"),
            Key("content"),
            Key("pageHeaderViewModel"),
            Key("image"),
            Key("decoratedAvatarViewModel"),
            Key("avatar"),
            Key("avatarViewModel"),
            Key("image"),
            Key("sources"),
        ],
    );

    largest_image(classic).or_else(|| largest_image(modern))
}

/// Largest `width × height` variant, else the last one listed
fn largest_image(images: &[Value]) -> Option<String> {
    let url_of = |image: &Value| image.get("url").and_then(Value::as_str).map(str::to_string);
    let area = |image: &Value| {
        let dim = |k: &str| image.get(k).and_then(Value::as_u64).unwrap_or(0);
        dim("width") * dim("height")
    };

    let largest = images
        .iter()
        .filter(|image| url_of(*image).is_some() && area(*image) > 0)
        .max_by_key(|image| area(*image));

    match largest {
        Some(image) => url_of(image),
        None => images.iter().rev().find_map(url_of),
    }
}
