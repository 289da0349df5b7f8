//! YouTube client library for YouTube Universe
//!
//! This crate scrapes public YouTube pages (no Data API key) to turn the
//! channel identifiers users type into canonical channel ids, and to enrich
//! them with a display name, an avatar and their recent uploads.
//!
//! # Features
//!
//! - **Identifier Resolution**: canonical ids, `/channel/` URLs, `@handles`,
//!   vanity URLs and plain names, with a write-once cache
//! - **Channel Search**: candidates from the search results page, used to
//!   suggest channels when the input is ambiguous
//! - **Profiles**: `og:` meta tags with an initial-data avatar fallback
//! - **Feeds**: the public Atom feed of a channel's uploads
//! - **Configuration Extension**: client settings read from `ytuconfig`
//!
//! # Example
//!
//! ```no_run
//! use ytuyoutube::{Resolution, YouTubeClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YouTubeClient::new().await?;
//!
//!     match client.resolve_or_suggest("veritasium", 8).await {
//!         Resolution::Found(id) => {
//!             let profile = client.fetch_channel_profile(&id).await;
//!             println!("{} -> {:?}", id, profile);
//!         }
//!         Resolution::Ambiguous(candidates) => {
//!             for c in candidates {
//!                 println!("did you mean {} ({})?", c.title, c.channel_id);
//!             }
//!         }
//!         Resolution::NotFound => println!("no such channel"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure model
//!
//! Resolution and profile lookups never fail: faults are logged and turned
//! into `None`. Search and feed retrieval return [`Error`] so callers can
//! tell "nothing found" from "upstream unreachable".

pub mod client;
pub mod config_ext;
pub mod error;
pub mod extract;
pub mod feed;
pub mod jsonpath;
pub mod models;
pub mod profile;
pub mod resolver;
pub mod search;
pub mod store;

// Re-exports
pub use client::{ClientBuilder, YouTubeClient};
pub use config_ext::YouTubeConfigExt;
pub use error::{Error, Result};
pub use extract::{InitialDataExtractor, PageExtractor};
pub use models::{
    fallback_title, ChannelCandidate, ChannelFeed, ChannelId, ChannelProfile, FeedItem, Resolution,
};
pub use store::{MokaOnceStore, OnceStore};
