//! Endpoints auxiliaires utilisés par la page de configuration
//!
//! Suggestions de chaînes, résolution d'une saisie, aperçu du flux,
//! inspection d'un jeton et état du service. Ils sont documentés en OpenAPI
//! et visibles sous `/swagger-ui/helpers`.

use crate::error::{CatalogError, Result};
use crate::install::{create_config, CreateConfigRequest, InstallLinks};
use crate::ytuserver_ext::CatalogState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use ytuconfig::tenant;
use ytuconfig::TenantConfig;
use ytuyoutube::{fallback_title, ChannelCandidate, ChannelId, FeedItem, Resolution};

/// Nombre maximum de suggestions renvoyées
pub const SUGGESTION_LIMIT: usize = 8;

/// Nom annoncé par `GET /`, attendu par les pages de configuration existantes
const SERVICE_NAME: &str = "stremio-youtube-backend";

/// Longueur de l'aperçu du jeton dans `/_cfg_debug`
const TOKEN_PREVIEW_LEN: usize = 24;

// ============================================================================
// Schemas
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub name: String,
    /// Heure du serveur (RFC 3339)
    pub time: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestQuery {
    /// Texte libre à chercher
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestResponse {
    pub query: String,
    #[schema(value_type = Vec<Object>)]
    pub suggestions: Vec<ChannelCandidate>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveQuery {
    /// Identifiant, handle, URL ou nom de chaîne
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub channel_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeedQuery {
    /// Identifiant canonique (`UC…`)
    pub channel_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub channel_id: String,
    pub videos: Vec<FeedVideo>,
}

/// Entrée du flux telle que vue par la page de configuration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedVideo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub published: Option<String>,
    pub link: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<FeedItem> for FeedVideo {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.video_id,
            title: item.title,
            published: item.published,
            link: item.page_url,
            thumbnail: item.thumbnail_url,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CfgDebugQuery {
    /// Jeton à inspecter
    pub cfg: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CfgDebugResponse {
    pub ok: bool,
    #[schema(value_type = Option<Object>)]
    pub cfg: Option<TenantConfig>,
    pub token_preview: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Handler pour GET / - état du service
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "helpers"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        name: SERVICE_NAME.to_string(),
        time: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler pour GET /suggest - chaînes proposées pour un texte libre
#[utoipa::path(
    get,
    path = "/suggest",
    params(SuggestQuery),
    responses(
        (status = 200, description = "Channel suggestions", body = SuggestResponse),
        (status = 400, description = "Missing query"),
        (status = 502, description = "Search page unreachable")
    ),
    tag = "helpers"
)]
pub async fn suggest(
    State(state): State<CatalogState>,
    Query(params): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>> {
    let query = params.query.unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err(CatalogError::MissingParameter("query"));
    }

    let suggestions = state
        .client
        .search_channels(&query, SUGGESTION_LIMIT)
        .await
        .map_err(CatalogError::SearchFailed)?;

    Ok(Json(SuggestResponse { query, suggestions }))
}

/// Handler pour GET /resolve - identifiant canonique d'une saisie
#[utoipa::path(
    get,
    path = "/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Channel found", body = ResolveResponse),
        (status = 400, description = "Missing input"),
        (status = 404, description = "Not found, possibly with suggestions")
    ),
    tag = "helpers"
)]
pub async fn resolve(
    State(state): State<CatalogState>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>> {
    let input = params.input.unwrap_or_default();
    if input.is_empty() {
        return Err(CatalogError::MissingParameter("input"));
    }

    let client = &state.client;
    let channel = match client.resolve_or_suggest(&input, SUGGESTION_LIMIT).await {
        Resolution::Found(channel) => channel,
        Resolution::Ambiguous(suggestions) => return Err(CatalogError::Ambiguous(suggestions)),
        Resolution::NotFound => return Err(CatalogError::ChannelNotFound),
    };

    let fallback = fallback_title(channel.as_str());
    let response = match client.fetch_channel_feed(&channel).await {
        Ok(feed) => ResolveResponse {
            title: feed.title.clone().unwrap_or(fallback),
            thumbnail: feed.first_thumbnail().map(str::to_string),
            channel_id: channel.into_string(),
        },
        Err(e) => {
            tracing::debug!("No feed for resolved channel {}: {}", channel, e);
            ResolveResponse {
                channel_id: channel.into_string(),
                title: fallback,
                thumbnail: None,
            }
        }
    };

    Ok(Json(response))
}

/// Handler pour GET /feed - dernières vidéos d'une chaîne
#[utoipa::path(
    get,
    path = "/feed",
    params(FeedQuery),
    responses(
        (status = 200, description = "Recent uploads", body = FeedResponse),
        (status = 400, description = "Invalid channel id"),
        (status = 502, description = "Feed unreachable")
    ),
    tag = "helpers"
)]
pub async fn feed(
    State(state): State<CatalogState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<FeedResponse>> {
    let channel = params
        .channel_id
        .as_deref()
        .and_then(ChannelId::parse)
        .ok_or(CatalogError::InvalidChannelId)?;

    let feed = state
        .client
        .fetch_channel_feed(&channel)
        .await
        .map_err(CatalogError::FeedFailed)?;

    Ok(Json(FeedResponse {
        channel_id: channel.into_string(),
        videos: feed.items.into_iter().map(FeedVideo::from).collect(),
    }))
}

/// Handler pour GET /_cfg_debug - contenu d'un jeton
///
/// Aussi servi sous `/cfg-debug`.
#[utoipa::path(
    get,
    path = "/_cfg_debug",
    params(CfgDebugQuery),
    responses((status = 200, description = "Decoded token", body = CfgDebugResponse)),
    tag = "helpers"
)]
pub async fn cfg_debug(Query(params): Query<CfgDebugQuery>) -> Json<CfgDebugResponse> {
    let token = params.cfg.unwrap_or_default();
    let cfg = if token.is_empty() {
        None
    } else {
        tenant::decode(&token)
    };

    Json(CfgDebugResponse {
        ok: cfg.is_some(),
        cfg,
        token_preview: token.chars().take(TOKEN_PREVIEW_LEN).collect(),
    })
}

/// Crée le router des helpers (à monter à la racine)
pub fn create_helpers_router(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/suggest", get(suggest))
        .route("/resolve", get(resolve))
        .route("/feed", get(feed))
        .route("/_cfg_debug", get(cfg_debug))
        .route("/cfg-debug", get(cfg_debug))
        .route("/create-config", post(create_config))
        .with_state(state)
}

/// API OpenAPI des helpers
#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        suggest,
        resolve,
        feed,
        cfg_debug,
        crate::install::create_config,
    ),
    components(
        schemas(
            HealthResponse,
            SuggestResponse,
            ResolveResponse,
            FeedResponse,
            FeedVideo,
            CfgDebugResponse,
            CreateConfigRequest,
            InstallLinks,
        )
    ),
    tags(
        (name = "helpers", description = "Configuration page helpers")
    ),
    info(
        title = "YouTube Universe helpers",
        description = "Channel lookup and config creation endpoints"
    )
)]
pub struct HelpersApiDoc;
