//! # ytucatalog - Catalogue de chaînes YouTube adressé par jeton
//!
//! Cette crate sert le protocole de catalogue des addons (description,
//! catalogue, fiche, lecture) pour une liste de chaînes choisie par
//! l'utilisateur. Toute la configuration voyage dans un jeton URL-safe :
//! le serveur ne garde aucune session.
//!
//! ## Architecture
//!
//! - [`api_rest`] : handlers HTTP des quatre ressources `/cfg/{token}/…`
//! - [`catalog`] : contenu des ressources (résolution, profils, flux)
//! - [`legacy`] : réécriture des anciennes URLs `?cfg=` / `?addon=`
//! - [`install`] : `POST /create-config` et liens d'installation
//! - [`helpers`] : suggestions, résolution, flux, état (documentés OpenAPI)
//! - [`ytuserver_ext`] : trait [`CatalogExt`] pour `ytuserver::Server`
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use ytucatalog::CatalogExt;
//! use ytuserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_catalog().await?;
//!     server.start().await;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod api_rest;
pub mod catalog;
pub mod config_ext;
pub mod error;
pub mod helpers;
pub mod ids;
pub mod install;
pub mod legacy;
pub mod manifest;
pub mod models;
pub mod ytuserver_ext;
mod ytuserver_impl;

pub use config_ext::CatalogConfigExt;
pub use error::{CatalogError, Result};
pub use ids::{CatalogId, ChannelKey};
pub use legacy::rewrite_legacy_request;
pub use manifest::build_manifest;
pub use ytuserver_ext::{CatalogExt, CatalogState};
