//! Extension pour lire la configuration du catalogue depuis ytuconfig

use anyhow::Result;
use ytuconfig::Config;

/// Affiche utilisée quand une chaîne n'a ni avatar ni vidéo
pub const DEFAULT_PLACEHOLDER_POSTER: &str = "https://i.imgur.com/PsWn3oM.png";

/// Trait d'extension pour lire les réglages du catalogue dans ytuconfig
pub trait CatalogConfigExt {
    /// Image par défaut des entrées de catalogue (`catalog.placeholder_poster`)
    fn get_catalog_placeholder_poster(&self) -> Result<String>;
}

impl CatalogConfigExt for Config {
    fn get_catalog_placeholder_poster(&self) -> Result<String> {
        Ok(self.get_string_or(
            &["catalog", "placeholder_poster"],
            DEFAULT_PLACEHOLDER_POSTER,
        ))
    }
}
