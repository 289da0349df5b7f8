//! # ytuserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple et ergonomique pour créer des serveurs HTTP
//! avec Axum. Les crates métier (catalogue, helpers) y enregistrent leurs routes au
//! démarrage.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : Interface simple pour créer des serveurs HTTP avec Axum
//! - 🔀 **Réécriture d'URI** : transformations appliquées avant le routage
//! - 🌍 **CORS ouvert** : toutes les réponses autorisent toutes les origines
//! - 📚 **Documentation OpenAPI** : Génération automatique de Swagger UI
//! - 🎚️ **Logs** : niveau rechargeable via `/api/logs/log_setup`
//! - ⚡ **Arrêt gracieux** : Gestion propre de l'arrêt sur Ctrl+C
//!
//! ## Architecture
//!
//! - [`server`] : Implémentation du serveur principal et du builder
//! - [`logs`] : Initialisation de `tracing` et API de réglage du niveau
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use ytuserver::{ServerBuilder, logs::LoggingOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = ServerBuilder::new("MyServer", "localhost", 8080).build();
//!     server.init_logging(LoggingOptions::default()).await;
//!
//!     // Ajout d'une route JSON
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     // Démarrage
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use server::{
    RequestRewriter, RewritingService, Server, ServerBuilder, ServerInfo, rewriting_service,
};
