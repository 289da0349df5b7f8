//! Création d'une configuration et liens d'installation
//!
//! `POST /create-config` reçoit la liste des chaînes, l'encode dans un jeton
//! et renvoie les URLs à donner au client (manifest, installation web,
//! lien profond).

use crate::ytuserver_ext::CatalogState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;
use utoipa::ToSchema;
use ytuconfig::tenant;
use ytuconfig::TenantConfig;

/// Page d'installation du client web
pub const WEB_INSTALL_URL: &str = "https://web.stremio.com/#/addons?addon=";
/// Schéma des liens profonds vers le client de bureau
pub const DEEP_LINK_SCHEME: &str = "stremio://";

/// Corps attendu par `POST /create-config`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigRequest {
    /// Identifiants bruts des chaînes (100 au plus)
    pub channels: Vec<String>,
    /// Mode RSS, `true` par défaut
    pub low_quota: Option<bool>,
}

/// Jeton et liens d'installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InstallLinks {
    pub token: String,
    pub manifest_url: String,
    pub web_install_url: String,
    pub deep_link_url: String,
}

impl InstallLinks {
    pub fn new(base_url: &str, token: String) -> Self {
        let manifest_url = format!("{}/cfg/{}/manifest.json", base_url.trim_end_matches('/'), token);
        let encoded: String = form_urlencoded::byte_serialize(manifest_url.as_bytes()).collect();
        let without_scheme = manifest_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&manifest_url);

        Self {
            web_install_url: format!("{}{}", WEB_INSTALL_URL, encoded),
            deep_link_url: format!("{}{}", DEEP_LINK_SCHEME, without_scheme),
            manifest_url,
            token,
        }
    }
}

/// Configuration issue d'un corps JSON quelconque
///
/// Un corps illisible donne une configuration vide. `lowQuota` absent vaut
/// `true` ; présent, il est évalué comme un booléen JSON permissif (`0`,
/// `""` et `null` valent `false`).
pub fn config_from_body(body: &Value) -> TenantConfig {
    let mut config = TenantConfig::from_json(body).unwrap_or_default();
    if let Some(flag) = body.get("lowQuota") {
        config.low_quota = truthy(flag);
    }
    config
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// URL publique du service
///
/// La valeur configurée l'emporte ; sinon elle est déduite de
/// `X-Forwarded-Proto` (défaut `https`) et `X-Forwarded-Host` / `Host`.
pub fn public_base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = configured {
        return url.trim_end_matches('/').to_string();
    }

    let first = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let proto = first("x-forwarded-proto").unwrap_or("https");
    let host = first("x-forwarded-host")
        .or_else(|| first(header::HOST.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}", proto, host)
}

/// Handler pour POST /create-config
#[utoipa::path(
    post,
    path = "/create-config",
    request_body = CreateConfigRequest,
    responses(
        (status = 200, description = "Token and install links", body = InstallLinks)
    ),
    tag = "helpers"
)]
pub async fn create_config(
    State(state): State<CatalogState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<InstallLinks> {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let config = config_from_body(&body);

    let token = tenant::encode(&config);
    let base_url = public_base_url(state.public_base_url.as_deref(), &headers);

    tracing::info!(
        "Config created: {} channels, lowQuota={}",
        config.channels.len(),
        config.low_quota
    );

    Json(InstallLinks::new(&base_url, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_install_links() {
        let links = InstallLinks::new("https://addon.example/", "eyJh".to_string());
        assert_eq!(links.manifest_url, "https://addon.example/cfg/eyJh/manifest.json");
        assert_eq!(
            links.web_install_url,
            "https://web.stremio.com/#/addons?addon=https%3A%2F%2Faddon.example%2Fcfg%2FeyJh%2Fmanifest.json"
        );
        assert_eq!(
            links.deep_link_url,
            "stremio://addon.example/cfg/eyJh/manifest.json"
        );
    }

    #[test]
    fn test_config_from_body() {
        let config = config_from_body(&json!({"channels": ["@a", 7, null, "b"]}));
        assert_eq!(config.channels, vec!["@a", "7", "b"]);
        assert!(config.low_quota);

        assert!(!config_from_body(&json!({"channels": [], "lowQuota": 0})).low_quota);
        assert!(!config_from_body(&json!({"lowQuota": null})).low_quota);
        assert!(config_from_body(&json!({"lowQuota": "yes"})).low_quota);

        let config = config_from_body(&json!({"channels": "nope"}));
        assert!(config.channels.is_empty());

        assert_eq!(config_from_body(&Value::Null), TenantConfig::default());
    }

    #[test]
    fn test_public_base_url() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:7000"));
        assert_eq!(public_base_url(None, &headers), "https://internal:7000");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("addon.example"));
        assert_eq!(public_base_url(None, &headers), "http://addon.example");

        assert_eq!(
            public_base_url(Some("https://configured.example/"), &headers),
            "https://configured.example"
        );
    }
}
