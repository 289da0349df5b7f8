//! Identifiants exposés au client : `ytc:<clé>` pour une chaîne, `ytv:<id>` pour une vidéo
//!
//! La clé d'une chaîne est son identifiant canonique quand il est connu,
//! sinon l'entrée brute encodée en base64url. Les handlers génériques
//! distinguent les deux espèces par leur préfixe seul.

use ytuconfig::tenant::{decode_text, encode_text};
use ytuyoutube::ChannelId;

pub const CHANNEL_PREFIX: &str = "ytc:";
pub const VIDEO_PREFIX: &str = "ytv:";

/// Identifiant de catalogue, classé par préfixe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogId<'a> {
    Channel(&'a str),
    Video(&'a str),
    /// Sans préfixe connu
    Other(&'a str),
}

impl<'a> CatalogId<'a> {
    pub fn parse(id: &'a str) -> Self {
        if let Some(rest) = id.strip_prefix(CHANNEL_PREFIX) {
            Self::Channel(rest)
        } else if let Some(rest) = id.strip_prefix(VIDEO_PREFIX) {
            Self::Video(rest)
        } else {
            Self::Other(id)
        }
    }
}

/// Clé `ytc:` d'une entrée de catalogue
pub fn channel_catalog_id(channel: Option<&ChannelId>, raw: &str) -> String {
    match channel {
        Some(id) => format!("{}{}", CHANNEL_PREFIX, id),
        None => format!("{}{}", CHANNEL_PREFIX, encode_text(raw)),
    }
}

pub fn video_catalog_id(video_id: &str) -> String {
    format!("{}{}", VIDEO_PREFIX, video_id)
}

/// Ce que désigne la clé d'une chaîne une fois décodée
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKey {
    /// Identifiant canonique, utilisable sans résolution
    Canonical(ChannelId),
    /// Texte à faire passer par le résolveur
    Raw(String),
}

impl ChannelKey {
    /// Décode la clé d'une chaîne (sans son préfixe)
    ///
    /// Une clé canonique est prise telle quelle. Sinon elle est décodée comme
    /// base64url ; un texte décodé canonique est accepté directement. Une clé
    /// qui ne se décode pas en UTF-8 reste du texte brut.
    pub fn decode(key: &str) -> Self {
        if let Some(id) = ChannelId::parse(key) {
            return Self::Canonical(id);
        }

        let text = decode_text(key).unwrap_or_else(|| key.to_string());
        match ChannelId::parse(&text) {
            Some(id) => Self::Canonical(id),
            None => Self::Raw(text),
        }
    }

    /// Texte de la clé, pour les libellés par défaut
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(id) => id.as_str(),
            Self::Raw(text) => text,
        }
    }
}
