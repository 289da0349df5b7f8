//! Erreurs HTTP du catalogue et des helpers
//!
//! Le message `Display` de chaque variante est exactement la valeur du champ
//! `error` renvoyé au client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use ytuyoutube::ChannelCandidate;

/// Type Result pour les handlers du catalogue
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Le jeton de configuration ne se décode pas
    #[error("invalid cfg")]
    InvalidToken,

    #[error("missing {0}")]
    MissingParameter(&'static str),

    #[error("invalid channelId")]
    InvalidChannelId,

    #[error("search_failed")]
    SearchFailed(#[source] ytuyoutube::Error),

    #[error("rss_fetch_failed")]
    FeedFailed(#[source] ytuyoutube::Error),

    /// Pas de résolution directe, mais la recherche propose des chaînes
    #[error("ambiguous")]
    Ambiguous(Vec<ChannelCandidate>),

    #[error("channel not found")]
    ChannelNotFound,
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidToken | Self::MissingParameter(_) | Self::InvalidChannelId => {
                StatusCode::BAD_REQUEST
            }
            Self::SearchFailed(_) | Self::FeedFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Ambiguous(_) | Self::ChannelNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Self::SearchFailed(e) | Self::FeedFailed(e) => {
                tracing::warn!("Upstream failure ({}): {}", self, e);
                json!({ "error": self.to_string() })
            }
            Self::Ambiguous(suggestions) => json!({
                "error": self.to_string(),
                "suggestions": suggestions,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
