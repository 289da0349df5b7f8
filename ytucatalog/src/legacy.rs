//! Réécriture des anciennes URLs d'installation
//!
//! Des clients déjà installés appellent encore `/manifest.json`,
//! `/catalog/…`, `/meta/…` ou `/stream/…` avec le jeton en paramètre de
//! requête :
//!
//! - `?cfg=<jeton>`
//! - `?addon=<URL du manifest>` (ou `?manifest=`), le jeton étant alors dans
//!   un segment `/cfg/<jeton>/` ou un paramètre `cfg=` de cette URL
//!
//! [`rewrite_legacy_request`] transforme ces requêtes en
//! `/cfg/<jeton><chemin>` avant le routage. Une requête sans jeton passe
//! inchangée.

use axum::extract::Request;
use axum::http::uri::{PathAndQuery, Uri};
use url::form_urlencoded;
use url::Url;

/// Paramètres consommés par la réécriture
const TOKEN_PARAMS: [&str; 3] = ["cfg", "addon", "manifest"];

fn is_legacy_path(path: &str) -> bool {
    path == "/manifest.json"
        || ["/catalog/", "/meta/", "/stream/"]
            .iter()
            .any(|prefix| path.starts_with(prefix))
}

/// Un jeton utilisable tel quel comme segment de chemin
fn is_path_safe(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'='))
}

/// Jeton contenu dans une URL de manifest
pub fn token_from_manifest_url(manifest_url: &str) -> Option<String> {
    let url = match Url::parse(manifest_url) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/").ok()?.join(manifest_url).ok()?
        }
        Err(_) => return None,
    };

    let from_path = url.path_segments().and_then(|mut segments| {
        segments.find(|s| *s == "cfg")?;
        segments.next().map(str::to_string)
    });

    from_path
        .filter(|token| !token.is_empty())
        .or_else(|| {
            url.query_pairs()
                .find(|(key, _)| key == "cfg")
                .map(|(_, value)| value.into_owned())
        })
}

/// Jeton d'une requête à l'ancienne, d'après sa chaîne de requête
pub fn legacy_token(query: &str) -> Option<String> {
    let params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let param = |name: &str| {
        params
            .iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.as_str())
    };

    if let Some(token) = param("cfg") {
        return Some(token.to_string());
    }

    param("addon")
        .or_else(|| param("manifest"))
        .and_then(token_from_manifest_url)
}

/// Réécrit une requête à l'ancienne vers `/cfg/<jeton>/…`
///
/// Les paramètres autres que `cfg`, `addon` et `manifest` sont conservés.
pub fn rewrite_legacy_request(mut request: Request) -> Request {
    let path = request.uri().path();
    if !is_legacy_path(path) {
        return request;
    }

    let Some(query) = request.uri().query() else {
        return request;
    };
    let Some(token) = legacy_token(query).filter(|t| is_path_safe(t)) else {
        return request;
    };

    let kept: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .filter(|(key, _)| !TOKEN_PARAMS.contains(&key.as_str()))
        .collect();

    let mut target = format!("/cfg/{}{}", token, path);
    if !kept.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(kept)
            .finish();
        target.push('?');
        target.push_str(&query);
    }

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = match PathAndQuery::try_from(target.as_str()) {
        Ok(pq) => Some(pq),
        Err(e) => {
            tracing::warn!("Legacy rewrite produced an invalid URI {:?}: {}", target, e);
            return request;
        }
    };

    match Uri::from_parts(parts) {
        Ok(uri) => {
            tracing::debug!("Legacy request rewritten: {} -> {}", request.uri(), uri);
            *request.uri_mut() = uri;
        }
        Err(e) => tracing::warn!("Legacy rewrite failed: {}", e),
    }

    request
}
