//! Contenu des ressources du protocole : catalogue, fiche, liens de lecture
//!
//! Ces fonctions ne connaissent ni HTTP ni le jeton : elles reçoivent la
//! configuration déjà décodée. Aucune ne peut échouer ; chaque défaut amont
//! dégrade seulement l'entrée concernée.

use crate::ids::{channel_catalog_id, video_catalog_id, CatalogId, ChannelKey, CHANNEL_PREFIX};
use crate::manifest::CATALOG_TYPE;
use crate::models::{Meta, MetaLink, MetaPreview, Stream, StreamHints, Video};
use crate::ytuserver_ext::CatalogState;
use tracing::{debug, warn};
use ytuconfig::TenantConfig;
use ytuyoutube::{fallback_title, ChannelId, FeedItem};

/// Page de lecture des vidéos
pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Liste les chaînes configurées, dans l'ordre de la configuration
///
/// Chaque chaîne est traitée par sa propre tâche. Une tâche qui échoue est
/// ignorée ; une chaîne non résolue produit quand même une entrée dont la
/// clé est l'entrée brute encodée. `search` filtre sur le nom ou l'entrée
/// brute, sans tenir compte de la casse.
pub async fn list_channels(
    state: &CatalogState,
    config: &TenantConfig,
    search: Option<&str>,
) -> Vec<MetaPreview> {
    let tasks: Vec<_> = config
        .channels
        .iter()
        .map(|raw| {
            let state = state.clone();
            let raw = raw.clone();
            tokio::spawn(async move {
                let preview = channel_preview(&state, &raw).await;
                (raw, preview)
            })
        })
        .collect();

    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut metas = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok((raw, preview)) => {
                if let Some(needle) = &needle {
                    let matches = preview.name.to_lowercase().contains(needle)
                        || raw.to_lowercase().contains(needle);
                    if !matches {
                        continue;
                    }
                }
                metas.push(preview);
            }
            Err(e) => warn!("Catalog entry skipped: {}", e),
        }
    }

    metas
}

/// Entrée de catalogue d'une chaîne configurée
pub async fn channel_preview(state: &CatalogState, raw: &str) -> MetaPreview {
    let client = &state.client;
    let channel = client.ensure_channel_id(raw).await;

    let mut name = if raw.starts_with('@') {
        raw.to_string()
    } else {
        fallback_title(channel.as_ref().map(ChannelId::as_str).unwrap_or(raw))
    };
    let mut poster = None;

    if let Some(id) = &channel {
        if let Some(profile) = client.fetch_channel_profile(id).await {
            name = profile.display_name;
            poster = profile.avatar_url;
        }

        if poster.is_none() {
            match client.fetch_channel_feed(id).await {
                Ok(feed) => poster = feed.first_thumbnail().map(str::to_string),
                Err(e) => debug!("No feed thumbnail for {}: {}", id, e),
            }
        }
    } else {
        debug!("Unresolved channel kept as raw entry: {:?}", raw);
    }

    MetaPreview {
        id: channel_catalog_id(channel.as_ref(), raw),
        kind: CATALOG_TYPE.to_string(),
        name,
        poster: poster.unwrap_or_else(|| state.placeholder_poster.to_string()),
        poster_shape: "square".to_string(),
    }
}

/// Fiche d'une chaîne
///
/// `id` est l'identifiant reçu, avec ou sans préfixe `ytc:`. Une fiche
/// minimale est toujours produite, même pour une clé inconnue.
pub async fn channel_meta(state: &CatalogState, config: &TenantConfig, id: &str) -> Meta {
    let client = &state.client;

    let key = match CatalogId::parse(id) {
        CatalogId::Channel(rest) => ChannelKey::decode(rest),
        _ => ChannelKey::decode(id),
    };
    let channel = match &key {
        ChannelKey::Canonical(channel) => Some(channel.clone()),
        ChannelKey::Raw(text) => client.ensure_channel_id(text).await,
    };
    let label = channel
        .as_ref()
        .map(ChannelId::as_str)
        .unwrap_or(key.as_str())
        .to_string();

    let mut name = format!("Channel {}", label);
    let mut poster = None;
    let mut videos = Vec::new();
    let mut links = Vec::new();

    if let Some(channel) = &channel {
        if let Some(profile) = client.fetch_channel_profile(channel).await {
            name = profile.display_name;
            poster = profile.avatar_url;
        }

        if config.low_quota {
            match client.fetch_channel_feed(channel).await {
                Ok(feed) => {
                    if let Some(title) = &feed.title {
                        name = title.clone();
                    }
                    if poster.is_none() {
                        poster = feed.first_thumbnail().map(str::to_string);
                    }
                    videos = feed.items.iter().filter_map(feed_video).collect();
                    debug!("Meta for {}: {} videos", channel, videos.len());
                }
                Err(e) => warn!("Feed unavailable for {}: {}", channel, e),
            }
        }

        links.push(MetaLink {
            name: "Channel on YouTube".to_string(),
            category: "YouTube".to_string(),
            url: client.channel_url(channel),
        });
    }

    let poster = poster.unwrap_or_else(|| state.placeholder_poster.to_string());
    let meta_id = if id.starts_with(CHANNEL_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", CHANNEL_PREFIX, label)
    };

    Meta {
        id: meta_id,
        kind: CATALOG_TYPE.to_string(),
        name,
        background: Some(poster.clone()),
        poster,
        description: None,
        videos,
        links,
    }
}

/// Vidéo d'une fiche ; les entrées de flux sans identifiant sont ignorées
fn feed_video(item: &FeedItem) -> Option<Video> {
    let video_id = item.video_id.as_deref()?;
    let title = item.title.clone().unwrap_or_else(|| "Video".to_string());
    let thumbnail = item.thumbnail_url.clone();

    Some(Video {
        id: video_catalog_id(video_id),
        kind: "movie".to_string(),
        name: title.clone(),
        title,
        released: item.published.clone(),
        release_info: item.release_date(),
        poster: thumbnail.clone(),
        thumbnail: thumbnail.clone(),
        background: thumbnail,
    })
}

/// Liens de lecture d'une vidéo `ytv:` ; vide pour tout autre identifiant
pub fn video_streams(id: &str) -> Vec<Stream> {
    let CatalogId::Video(video_id) = CatalogId::parse(id) else {
        return Vec::new();
    };
    if video_id.is_empty() {
        return Vec::new();
    }

    let encoded: String = url::form_urlencoded::byte_serialize(video_id.as_bytes()).collect();
    let link = format!("{}{}", WATCH_URL, encoded);

    vec![Stream {
        name: "YouTube".to_string(),
        title: "Open on YouTube".to_string(),
        external_url: link.clone(),
        url: link,
        behavior_hints: StreamHints {
            open_external: true,
            not_web_ready: true,
        },
    }]
}
