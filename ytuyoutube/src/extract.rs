//! Extraction of structured data from raw YouTube HTML
//!
//! Everything that depends on the page markup goes through [`PageExtractor`],
//! so a layout change upstream only touches one implementation.

use crate::jsonpath::{pluck, pluck_array, Key};
use crate::models::ChannelId;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

/// Markers carrying the canonical id of the page's channel, by priority
static CHANNEL_ID_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""channelId"\s*:\s*"(UC[0-9A-Za-z_-]{20,})""#,
        r#""externalId"\s*:\s*"(UC[0-9A-Za-z_-]{20,})""#,
        r#"<link\s+rel="canonical"\s+href="[^"]*/channel/(UC[0-9A-Za-z_-]{20,})""#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Start of the initial-data blob, in its known shapes:
/// `"ytInitialData": {`, `var ytInitialData = {` and `window["ytInitialData"] = {`
static INITIAL_DATA_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:var\s+ytInitialData\s*=|ytInitialData"\s*\]?\s*[:=])\s*\{"#).unwrap()
});

/// Turns raw channel/search page HTML into structured values
pub trait PageExtractor: Send + Sync {
    /// Canonical id of the channel the page belongs to
    fn channel_id(&self, html: &str) -> Option<ChannelId>;

    /// The page's embedded initial-data JSON document
    fn initial_data(&self, html: &str) -> Option<Value>;

    /// Contents of `<meta property="…">` for each of `properties`, in order
    ///
    /// The page is parsed once for all of them.
    fn meta_properties(&self, html: &str, properties: &[&str]) -> Vec<Option<String>>;

    /// Content of `<meta property="{property}">`
    fn meta_property(&self, html: &str, property: &str) -> Option<String> {
        self.meta_properties(html, &[property]).pop().flatten()
    }
}

/// Default extractor: regex markers, balanced-brace blob extraction and
/// `scraper` for meta tags
#[derive(Debug, Clone, Copy, Default)]
pub struct InitialDataExtractor;

impl PageExtractor for InitialDataExtractor {
    fn channel_id(&self, html: &str) -> Option<ChannelId> {
        CHANNEL_ID_MARKERS.iter().find_map(|re| {
            re.captures(html)
                .and_then(|cap| cap.get(1))
                .and_then(|m| ChannelId::parse(m.as_str()))
        })
    }

    fn initial_data(&self, html: &str) -> Option<Value> {
        INITIAL_DATA_START.find_iter(html).find_map(|m| {
            // The match ends right after the opening brace
            let start = m.end() - 1;
            let blob = balanced_object(&html[start..])?;
            match serde_json::from_str::<Value>(blob) {
                Ok(value) if value.is_object() => Some(value),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!("ytInitialData candidate did not parse: {}", e);
                    None
                }
            }
        })
    }

    fn meta_properties(&self, html: &str, properties: &[&str]) -> Vec<Option<String>> {
        let document = Html::parse_document(html);

        properties
            .iter()
            .map(|property| {
                let selector =
                    Selector::parse(&format!(r#"meta[property="{}"]"#, property)).ok()?;
                document
                    .select(&selector)
                    .filter_map(|element| element.value().attr("content"))
                    .map(str::trim)
                    .find(|content| !content.is_empty())
                    .map(str::to_string)
            })
            .collect()
    }
}

/// Returns the JSON object starting at the first byte of `text`
///
/// Counts braces outside string literals, honouring backslash escapes.
fn balanced_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Text of a YouTube "formatted string": `simpleText`, else the joined `runs`
pub fn formatted_text(value: &Value) -> Option<String> {
    if let Some(s) = pluck(value, &[Key("simpleText")]).and_then(Value::as_str) {
        return Some(s.to_string());
    }
    let runs = pluck_array(value, &[Key("runs")]);
    if runs.is_empty() {
        return None;
    }
    Some(
        runs.iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect::<String>(),
    )
}

/// Adds a scheme to protocol-relative URLs (`//yt3.ggpht.com/...`)
pub fn absolute_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_id_marker_priority() {
        let html = r#"<script>{"externalId":"UCexternal0000000000000000","channelId":"UCchannel00000000000000000"}</script>"#;
        assert_eq!(
            InitialDataExtractor.channel_id(html).unwrap().as_str(),
            "UCchannel00000000000000000"
        );

        let html = r#"<script>{"externalId":"UCexternal0000000000000000"}</script>"#;
        assert_eq!(
            InitialDataExtractor.channel_id(html).unwrap().as_str(),
            "UCexternal0000000000000000"
        );

        let html = r#"<link rel="canonical" href="https://www.youtube.com/channel/UCcanonical000000000000000">"#;
        assert_eq!(
            InitialDataExtractor.channel_id(html).unwrap().as_str(),
            "UCcanonical000000000000000"
        );

        assert!(InitialDataExtractor.channel_id("<html></html>").is_none());
    }

    #[test]
    fn test_initial_data_assignment_form() {
        let html = r#"<script>var ytInitialData = {"a":{"b":"}{ \" tricky"},"n":1};</script>"#;
        let data = InitialDataExtractor.initial_data(html).unwrap();
        assert_eq!(data["a"]["b"], "}{ \" tricky");
        assert_eq!(data["n"], 1);
    }

    #[test]
    fn test_initial_data_property_form() {
        let html = r#"<script>window.cfg = {"ytInitialData": {"x": [1, {"y": 2}]}, "other": 3}</script>"#;
        let data = InitialDataExtractor.initial_data(html).unwrap();
        assert_eq!(data, json!({"x": [1, {"y": 2}]}));
    }

    #[test]
    fn test_initial_data_window_form() {
        let html = r#"<script>window["ytInitialData"] = {"k":"v"};</script>"#;
        let data = InitialDataExtractor.initial_data(html).unwrap();
        assert_eq!(data["k"], "v");
    }

    #[test]
    fn test_initial_data_missing_or_broken() {
        assert!(InitialDataExtractor.initial_data("<html></html>").is_none());
        assert!(InitialDataExtractor
            .initial_data("var ytInitialData = {\"a\": ")
            .is_none());
    }

    #[test]
    fn test_meta_property() {
        let html = r#"<html><head>
            <meta property="og:title" content="Tom &amp; Jerry">
            <meta property="og:image" content="https://yt3.ggpht.com/avatar=s900">
        </head></html>"#;
        assert_eq!(
            InitialDataExtractor.meta_property(html, "og:title").as_deref(),
            Some("Tom & Jerry")
        );
        assert_eq!(
            InitialDataExtractor.meta_property(html, "og:image").as_deref(),
            Some("https://yt3.ggpht.com/avatar=s900")
        );
        assert!(InitialDataExtractor
            .meta_property(html, "og:description")
            .is_none());

        assert_eq!(
            InitialDataExtractor.meta_properties(html, &["og:image", "og:description", "og:title"]),
            vec![
                Some("https://yt3.ggpht.com/avatar=s900".to_string()),
                None,
                Some("Tom & Jerry".to_string()),
            ]
        );
    }

    #[test]
    fn test_formatted_text() {
        assert_eq!(
            formatted_text(&json!({"simpleText": "Hello"})).as_deref(),
            Some("Hello")
        );
        assert_eq!(
            formatted_text(&json!({"runs": [{"text": "Hel"}, {"text": "lo"}]})).as_deref(),
            Some("Hello")
        );
        assert_eq!(formatted_text(&json!({})), None);
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("//i.ytimg.com/x.jpg"), "https://i.ytimg.com/x.jpg");
        assert_eq!(absolute_url("https://i.ytimg.com/x.jpg"), "https://i.ytimg.com/x.jpg");
    }
}
