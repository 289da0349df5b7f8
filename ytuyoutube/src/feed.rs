//! Channel uploads through the public Atom feed
//!
//! `GET {feed_root}/feeds/videos.xml?channel_id=UC…` lists the 15 most recent
//! uploads. The feed is never cached.

use crate::client::YouTubeClient;
use crate::error::Result;
use crate::models::{ChannelFeed, ChannelId, FeedItem};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

impl YouTubeClient {
    /// Fetches and parses the Atom feed of a channel
    pub async fn fetch_channel_feed(&self, id: &ChannelId) -> Result<ChannelFeed> {
        let url = format!("{}/feeds/videos.xml?channel_id={}", self.feed_url(), id);

        tracing::debug!("Fetching channel feed: {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.fetch_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(crate::Error::api_error(format!(
                "Feed returned status: {}",
                response.status()
            )));
        }

        let xml = response.text().await?;
        let feed = parse_feed(&xml)?;

        tracing::debug!("Feed for {}: {} entries", id, feed.items.len());
        Ok(feed)
    }
}

/// Element whose text is being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FeedTitle,
    VideoId,
    Title,
    Published,
}

/// Parses a YouTube Atom feed
///
/// Missing elements leave the matching fields empty; only malformed XML is
/// an error.
pub fn parse_feed(xml: &str) -> Result<ChannelFeed> {
    let mut reader = Reader::from_str(xml);

    let mut feed = ChannelFeed::default();
    let mut entry: Option<FeedItem> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();
    // Nesting depth below <feed>, only direct children carry the channel title
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match e.name().as_ref() {
                    b"entry" => entry = Some(FeedItem::default()),
                    b"link" => on_link(&e, entry.as_mut()),
                    b"media:thumbnail" => on_thumbnail(&e, entry.as_mut()),
                    name => {
                        field = match (name, entry.is_some()) {
                            (b"title", false) if depth == 2 => Some(Field::FeedTitle),
                            (b"title", true) => Some(Field::Title),
                            (b"yt:videoId", true) => Some(Field::VideoId),
                            (b"published", true) => Some(Field::Published),
                            _ => None,
                        };
                        text.clear();
                    }
                }
            }
            Event::Empty(e) => match e.name().as_ref() {
                b"link" => on_link(&e, entry.as_mut()),
                b"media:thumbnail" => on_thumbnail(&e, entry.as_mut()),
                _ => {}
            },
            Event::Text(e) => {
                if field.is_some() {
                    text.push_str(&e.decode().map_err(quick_xml::Error::Encoding)?);
                }
            }
            Event::CData(e) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                if field.is_some() {
                    let name = e.decode().map_err(quick_xml::Error::Encoding)?;
                    let reference = format!("&{};", name);
                    match quick_xml::escape::unescape(&reference) {
                        Ok(resolved) => text.push_str(&resolved),
                        Err(_) => text.push_str(&reference),
                    }
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if e.name().as_ref() == b"entry" {
                    if let Some(item) = entry.take() {
                        feed.items.push(item);
                    }
                } else if let Some(f) = field.take() {
                    let value = Some(text.trim().to_string()).filter(|v| !v.is_empty());
                    match (f, entry.as_mut()) {
                        (Field::FeedTitle, _) => feed.title = value,
                        (Field::VideoId, Some(item)) => item.video_id = value,
                        (Field::Title, Some(item)) => item.title = value,
                        (Field::Published, Some(item)) => item.published = value,
                        _ => {}
                    }
                    text.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(feed)
}

/// Value of attribute `key`, entities resolved
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| {
            let raw = String::from_utf8_lossy(&attr.value).into_owned();
            match quick_xml::escape::unescape(&raw) {
                Ok(value) => value.into_owned(),
                Err(_) => raw,
            }
        })
}

/// `rel="alternate"` wins; otherwise the first link is kept
fn on_link(e: &BytesStart<'_>, entry: Option<&mut FeedItem>) {
    let Some(item) = entry else { return };
    let Some(href) = attribute(e, b"href") else { return };

    let rel = attribute(e, b"rel");
    match rel.as_deref() {
        Some("alternate") => item.page_url = Some(href),
        _ if item.page_url.is_none() => item.page_url = Some(href),
        _ => {}
    }
}

fn on_thumbnail(e: &BytesStart<'_>, entry: Option<&mut FeedItem>) {
    if let Some(item) = entry {
        if item.thumbnail_url.is_none() {
            item.thumbnail_url = attribute(e, b"url");
        }
    }
}
