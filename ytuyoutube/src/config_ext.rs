//! Extension pour lire la configuration YouTube depuis ytuconfig
//!
//! Ce module fournit le trait `YouTubeConfigExt` qui ajoute à
//! `ytuconfig::Config` les réglages du client YouTube (racines du site et
//! des flux, en-têtes, délais d'attente) ainsi qu'un raccourci pour
//! construire un [`ClientBuilder`] préconfiguré.
//!
//! # Exemple
//!
//! ```no_run
//! use ytuconfig::get_config;
//! use ytuyoutube::YouTubeConfigExt;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! let client = config.youtube_client_builder()?.build().await?;
//! println!("Scraping {}", client.site_url());
//! # Ok(())
//! # }
//! ```

use crate::client::{
    ClientBuilder, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_FEED_URL,
    DEFAULT_RESOLVE_TIMEOUT_SECS, DEFAULT_SITE_URL, DEFAULT_USER_AGENT,
};
use anyhow::Result;
use std::time::Duration;
use ytuconfig::Config;

/// Trait d'extension pour lire la configuration YouTube dans ytuconfig
///
/// Les getters sont en lecture seule : une valeur absente ou invalide
/// retombe sur la valeur par défaut du client, sans rien écrire.
pub trait YouTubeConfigExt {
    // ========================================================================
    // Endpoints
    // ========================================================================

    /// Racine du site (pages de chaîne, recherche)
    fn get_youtube_site_url(&self) -> Result<String>;

    /// Racine des flux Atom
    fn get_youtube_feed_url(&self) -> Result<String>;

    // ========================================================================
    // Requêtes
    // ========================================================================

    fn get_youtube_user_agent(&self) -> Result<String>;

    fn get_youtube_accept_language(&self) -> Result<String>;

    /// Délai d'attente pour la résolution d'identifiants (défaut 12 s)
    fn get_youtube_resolve_timeout(&self) -> Result<Duration>;

    /// Délai d'attente pour les profils, la recherche et les flux (défaut 15 s)
    fn get_youtube_fetch_timeout(&self) -> Result<Duration>;

    /// Construit un `ClientBuilder` à partir de ces réglages
    fn youtube_client_builder(&self) -> Result<ClientBuilder> {
        Ok(ClientBuilder::new()
            .site_url(self.get_youtube_site_url()?)
            .feed_url(self.get_youtube_feed_url()?)
            .user_agent(self.get_youtube_user_agent()?)
            .accept_language(self.get_youtube_accept_language()?)
            .resolve_timeout(self.get_youtube_resolve_timeout()?)
            .fetch_timeout(self.get_youtube_fetch_timeout()?))
    }
}

impl YouTubeConfigExt for Config {
    fn get_youtube_site_url(&self) -> Result<String> {
        Ok(self.get_string_or(&["youtube", "site_url"], DEFAULT_SITE_URL))
    }

    fn get_youtube_feed_url(&self) -> Result<String> {
        Ok(self.get_string_or(&["youtube", "feed_url"], DEFAULT_FEED_URL))
    }

    fn get_youtube_user_agent(&self) -> Result<String> {
        Ok(self.get_string_or(&["youtube", "user_agent"], DEFAULT_USER_AGENT))
    }

    fn get_youtube_accept_language(&self) -> Result<String> {
        Ok(self.get_string_or(&["youtube", "accept_language"], DEFAULT_ACCEPT_LANGUAGE))
    }

    fn get_youtube_resolve_timeout(&self) -> Result<Duration> {
        let secs = self.get_u64_or(
            &["youtube", "resolve_timeout_secs"],
            DEFAULT_RESOLVE_TIMEOUT_SECS,
        );
        Ok(Duration::from_secs(secs))
    }

    fn get_youtube_fetch_timeout(&self) -> Result<Duration> {
        let secs = self.get_u64_or(&["youtube", "fetch_timeout_secs"], DEFAULT_FETCH_TIMEOUT_SECS);
        Ok(Duration::from_secs(secs))
    }
}
