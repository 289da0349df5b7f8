//! Implémentation du trait CatalogExt pour ytuserver::Server
//!
//! `ytucatalog` étend `ytuserver::Server` sans que `ytuserver` connaisse
//! `ytucatalog` : c'est le pattern d'extension, un trait ajoutant des
//! fonctionnalités à un type externe.

use crate::api_rest::create_router;
use crate::config_ext::CatalogConfigExt;
use crate::helpers::{create_helpers_router, HelpersApiDoc};
use crate::legacy::rewrite_legacy_request;
use crate::ytuserver_ext::{CatalogExt, CatalogState};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use ytuserver::Server;
use ytuyoutube::YouTubeConfigExt;

impl CatalogExt for Server {
    async fn init_catalog(&mut self) -> Result<Arc<CatalogState>> {
        info!("Initializing YouTube catalog...");

        let config = ytuconfig::get_config();
        let client = config
            .youtube_client_builder()?
            .build()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create YouTube client: {}", e))?;

        let state = CatalogState::new(client)
            .with_placeholder_poster(config.get_catalog_placeholder_poster()?)
            .with_public_base_url(config.get_public_base_url());

        self.init_catalog_with_state(state).await
    }

    async fn init_catalog_with_state(&mut self, state: CatalogState) -> Result<Arc<CatalogState>> {
        self.add_router("/", create_router(state.clone())).await;
        self.add_request_rewriter(rewrite_legacy_request);

        self.add_documented_router(
            "/",
            create_helpers_router(state.clone()),
            HelpersApiDoc::openapi(),
            "helpers",
        )
        .await;

        info!("Catalog initialized");
        info!("Manifest available at /cfg/{{token}}/manifest.json");
        info!("Helpers documented at /swagger-ui/helpers");

        Ok(Arc::new(state))
    }
}
