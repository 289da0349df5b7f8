//! HTTP client for YouTube pages and feeds
//!
//! The client scrapes public pages only (no Data API key). It owns the two
//! write-once stores used by the resolver and the profile fetcher; clones
//! share them.
//!
//! # Example
//!
//! ```no_run
//! use ytuyoutube::YouTubeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YouTubeClient::new().await?;
//!
//!     if let Some(id) = client.ensure_channel_id("@veritasium").await {
//!         let feed = client.fetch_channel_feed(&id).await?;
//!         println!("{} uploads", feed.items.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::extract::{InitialDataExtractor, PageExtractor};
use crate::models::{ChannelId, ChannelProfile};
use crate::store::{MokaOnceStore, OnceStore};
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default YouTube site root
pub const DEFAULT_SITE_URL: &str = "https://www.youtube.com";

/// Default root for `/feeds/videos.xml`
pub const DEFAULT_FEED_URL: &str = "https://www.youtube.com";

/// Timeout for identifier resolution page fetches (12 seconds)
pub const DEFAULT_RESOLVE_TIMEOUT_SECS: u64 = 12;

/// Timeout for profile, search and feed fetches (15 seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Browser-like User-Agent, YouTube serves a degraded page to unknown agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Forces the English interface
const PREF_COOKIE: &str = "PREF=hl=en";

/// YouTube HTTP client
///
/// Provides:
/// - identifier resolution (`resolve_channel_id`, `ensure_channel_id`)
/// - channel search (`search_channels`)
/// - profile scraping (`fetch_channel_profile`)
/// - Atom feed retrieval (`fetch_channel_feed`)
#[derive(Clone)]
pub struct YouTubeClient {
    pub(crate) client: Client,
    site_url: String,
    feed_url: String,
    user_agent: String,
    accept_language: String,
    pub(crate) resolve_timeout: Duration,
    pub(crate) fetch_timeout: Duration,
    pub(crate) extractor: Arc<dyn PageExtractor>,
    pub(crate) channel_ids: Arc<dyn OnceStore<ChannelId>>,
    pub(crate) profiles: Arc<dyn OnceStore<ChannelProfile>>,
}

impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("site_url", &self.site_url)
            .field("feed_url", &self.feed_url)
            .field("resolve_timeout", &self.resolve_timeout)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the site root (no trailing slash)
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Get the feed root (no trailing slash)
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Store of resolved identifiers, keyed by trimmed raw input
    pub fn channel_id_store(&self) -> &Arc<dyn OnceStore<ChannelId>> {
        &self.channel_ids
    }

    /// Store of scraped profiles, keyed by canonical id
    pub fn profile_store(&self) -> &Arc<dyn OnceStore<ChannelProfile>> {
        &self.profiles
    }

    /// Public page of a channel
    pub fn channel_url(&self, id: &ChannelId) -> String {
        format!("{}/channel/{}", self.site_url, id)
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// GET a page with browser-like headers, failing on non-2xx statuses
    pub(crate) async fn fetch_page(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!("Fetching page: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .header(COOKIE, PREF_COOKIE)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::api_error(format!(
                "{} returned status: {}",
                url,
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

/// Builder for configuring a YouTubeClient
pub struct ClientBuilder {
    client: Option<Client>,
    site_url: String,
    feed_url: String,
    user_agent: String,
    accept_language: String,
    resolve_timeout: Duration,
    fetch_timeout: Duration,
    proxy: Option<String>,
    extractor: Option<Arc<dyn PageExtractor>>,
    channel_ids: Option<Arc<dyn OnceStore<ChannelId>>>,
    profiles: Option<Arc<dyn OnceStore<ChannelProfile>>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            resolve_timeout: Duration::from_secs(DEFAULT_RESOLVE_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            proxy: None,
            extractor: None,
            channel_ids: None,
            profiles: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the site root (pages, search, channel links)
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the feed root
    pub fn feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Point both the site and the feed at the same root (mock servers)
    pub fn base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.site_url(url.clone()).feed_url(url)
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the Accept-Language header
    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = accept_language.into();
        self
    }

    /// Set the timeout for identifier resolution
    pub fn resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Set the timeout for profile, search and feed fetches
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Replace the markup extractor
    pub fn extractor(mut self, extractor: Arc<dyn PageExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Use an existing store for resolved identifiers
    pub fn channel_id_store(mut self, store: Arc<dyn OnceStore<ChannelId>>) -> Self {
        self.channel_ids = Some(store);
        self
    }

    /// Use an existing store for profiles
    pub fn profile_store(mut self, store: Arc<dyn OnceStore<ChannelProfile>>) -> Self {
        self.profiles = Some(store);
        self
    }

    /// Build the client
    pub async fn build(self) -> Result<YouTubeClient> {
        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder().user_agent(&self.user_agent);

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::other(format!("Invalid proxy: {}", e)))?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        url::Url::parse(&self.site_url)?;
        url::Url::parse(&self.feed_url)?;

        Ok(YouTubeClient {
            client,
            site_url: self.site_url,
            feed_url: self.feed_url,
            user_agent: self.user_agent,
            accept_language: self.accept_language,
            resolve_timeout: self.resolve_timeout,
            fetch_timeout: self.fetch_timeout,
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(InitialDataExtractor)),
            channel_ids: self.channel_ids.unwrap_or_else(MokaOnceStore::shared),
            profiles: self.profiles.unwrap_or_else(MokaOnceStore::shared),
        })
    }
}
