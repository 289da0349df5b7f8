//! Endpoints HTTP du protocole de catalogue
//!
//! Ce module définit les handlers des quatre ressources adressées par jeton
//! (`manifest`, `catalog`, `meta`, `stream`).

use crate::catalog::{channel_meta, list_channels, video_streams};
use crate::error::{CatalogError, Result};
use crate::manifest::{build_manifest, CATALOG_ID, CATALOG_TYPE};
use crate::models::{CatalogResponse, MetaResponse, StreamsResponse};
use crate::ytuserver_ext::CatalogState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use ytuconfig::tenant;
use ytuconfig::TenantConfig;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate";
pub const MANIFEST_CACHE: &str = "no-store";

/// Crée le router du protocole de catalogue
pub fn create_router(state: CatalogState) -> Router {
    Router::new()
        .route("/cfg/{token}/manifest.json", get(get_manifest))
        .route("/cfg/{token}/catalog/{kind}/{file}", get(get_catalog))
        .route(
            "/cfg/{token}/catalog/{kind}/{id}/{extra}",
            get(get_catalog_with_extra),
        )
        .route("/cfg/{token}/meta/{kind}/{file}", get(get_meta))
        .route("/cfg/{token}/stream/{kind}/{file}", get(get_stream))
        // Anciennes formes restées sans jeton après réécriture
        .route("/manifest.json", get(missing_token))
        .route("/catalog/{kind}/{file}", get(missing_token))
        .route("/meta/{kind}/{file}", get(missing_token))
        .route("/stream/{kind}/{file}", get(missing_token))
        .with_state(state)
}

// ============================================================================
// Helpers
// ============================================================================

fn decode_token(token: &str) -> Result<TenantConfig> {
    tenant::decode(token).ok_or(CatalogError::InvalidToken)
}

/// Réponse JSON UTF-8 non mise en cache
fn protocol_json<T: Serialize>(body: T, cache_control: &'static str) -> Response {
    (
        [
            (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, cache_control),
        ],
        Json(body),
    )
        .into_response()
}

/// `id.json` → `id`
fn json_stem(file: &str) -> Option<&str> {
    file.strip_suffix(".json").filter(|stem| !stem.is_empty())
}

/// Valeur de `search` dans un segment extra (`search=foo&skip=0`)
fn search_extra(extra: &str) -> Option<String> {
    url::form_urlencoded::parse(extra.as_bytes())
        .find(|(key, _)| key == "search")
        .map(|(_, value)| value.into_owned())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /cfg/{token}/manifest.json
async fn get_manifest(Path(token): Path<String>) -> Result<Response> {
    let config = decode_token(&token)?;
    Ok(protocol_json(build_manifest(&config), MANIFEST_CACHE))
}

/// GET /cfg/{token}/catalog/{type}/{id}.json
async fn get_catalog(
    State(state): State<CatalogState>,
    Path((token, kind, file)): Path<(String, String, String)>,
) -> Result<Response> {
    let config = decode_token(&token)?;
    let Some(id) = json_stem(&file) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    catalog_response(&state, &config, &kind, id, None).await
}

/// GET /cfg/{token}/catalog/{type}/{id}/{extra}.json
async fn get_catalog_with_extra(
    State(state): State<CatalogState>,
    Path((token, kind, id, extra)): Path<(String, String, String, String)>,
) -> Result<Response> {
    let config = decode_token(&token)?;
    let Some(extra) = json_stem(&extra) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let search = search_extra(extra);
    catalog_response(&state, &config, &kind, &id, search.as_deref()).await
}

async fn catalog_response(
    state: &CatalogState,
    config: &TenantConfig,
    kind: &str,
    id: &str,
    search: Option<&str>,
) -> Result<Response> {
    if kind != CATALOG_TYPE || id != CATALOG_ID {
        return Ok(protocol_json(CatalogResponse { metas: Vec::new() }, NO_CACHE));
    }

    let metas = list_channels(state, config, search).await;
    tracing::debug!("Catalog: {} entries", metas.len());
    Ok(protocol_json(CatalogResponse { metas }, NO_CACHE))
}

/// GET /cfg/{token}/meta/{type}/{id}.json
async fn get_meta(
    State(state): State<CatalogState>,
    Path((token, _kind, file)): Path<(String, String, String)>,
) -> Result<Response> {
    let config = decode_token(&token)?;
    let Some(id) = json_stem(&file) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let meta = channel_meta(&state, &config, id).await;
    Ok(protocol_json(MetaResponse { meta }, NO_CACHE))
}

/// GET /cfg/{token}/stream/{type}/{id}.json
async fn get_stream(Path((token, _kind, file)): Path<(String, String, String)>) -> Result<Response> {
    decode_token(&token)?;
    let Some(id) = json_stem(&file) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let streams = video_streams(id);
    Ok(protocol_json(StreamsResponse { streams }, NO_CACHE))
}

async fn missing_token() -> CatalogError {
    CatalogError::InvalidToken
}
