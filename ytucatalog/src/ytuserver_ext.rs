//! Extension ytuserver pour le catalogue
//!
//! Ce module fournit un trait d'extension pour ajouter le catalogue et ses
//! helpers à un serveur ytuserver.

use crate::config_ext::DEFAULT_PLACEHOLDER_POSTER;
use anyhow::Result;
use std::sync::Arc;
use ytuyoutube::YouTubeClient;

/// État partagé pour les handlers du catalogue
#[derive(Clone)]
pub struct CatalogState {
    pub client: YouTubeClient,
    pub placeholder_poster: Arc<str>,
    /// URL publique du service ; `None` pour la déduire des en-têtes
    pub public_base_url: Option<Arc<str>>,
}

impl CatalogState {
    pub fn new(client: YouTubeClient) -> Self {
        Self {
            client,
            placeholder_poster: Arc::from(DEFAULT_PLACEHOLDER_POSTER),
            public_base_url: None,
        }
    }

    pub fn with_placeholder_poster(mut self, poster: impl Into<String>) -> Self {
        self.placeholder_poster = Arc::from(poster.into());
        self
    }

    pub fn with_public_base_url(mut self, url: Option<String>) -> Self {
        self.public_base_url = url.map(Arc::from);
        self
    }
}

/// Trait pour étendre ytuserver avec le catalogue
///
/// Ce trait permet à `ytucatalog` d'ajouter des méthodes d'extension sur
/// `ytuserver::Server` sans que ytuserver dépende de ytucatalog.
///
/// # Exemple
///
/// ```rust,no_run
/// use ytucatalog::CatalogExt;
/// use ytuserver::ServerBuilder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut server = ServerBuilder::new_configured().build();
///
///     server.init_catalog().await?;
///
///     server.start().await;
///     server.wait().await;
///     Ok(())
/// }
/// ```
pub trait CatalogExt {
    /// Initialise le catalogue depuis la configuration globale
    ///
    /// Cette méthode :
    /// - Construit le client YouTube à partir de la section `youtube`
    /// - Enregistre les quatre ressources du protocole sous `/cfg/{token}/…`
    /// - Enregistre la réécriture des anciennes URLs `?cfg=` / `?addon=`
    /// - Enregistre `POST /create-config` et les helpers documentés
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /cfg/{token}/manifest.json`
    /// - `GET /cfg/{token}/catalog/{type}/{id}.json`
    /// - `GET /cfg/{token}/meta/{type}/{id}.json`
    /// - `GET /cfg/{token}/stream/{type}/{id}.json`
    /// - `POST /create-config`
    /// - `GET /`, `/suggest`, `/resolve`, `/feed`, `/_cfg_debug`
    /// - `GET /swagger-ui/helpers`
    async fn init_catalog(&mut self) -> Result<Arc<CatalogState>>;

    /// Initialise le catalogue avec un état déjà construit
    ///
    /// Permet d'injecter un client (stores, URLs amont) préparé ailleurs,
    /// notamment dans les tests.
    async fn init_catalog_with_state(&mut self, state: CatalogState) -> Result<Arc<CatalogState>>;
}

// L'implémentation du trait est dans ytuserver_impl.rs
