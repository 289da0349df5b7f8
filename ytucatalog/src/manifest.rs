//! Construction du document `manifest.json`

use crate::ids::{CHANNEL_PREFIX, VIDEO_PREFIX};
use crate::models::{CatalogDescriptor, ExtraDescriptor, Manifest, ManifestHints};
use ytuconfig::TenantConfig;

pub const ADDON_ID: &str = "org.cary.youtube.universe";
pub const ADDON_VERSION: &str = "1.0.0";
pub const ADDON_NAME: &str = "YouTube Universe";

/// Seul catalogue servi
pub const CATALOG_TYPE: &str = "series";
pub const CATALOG_ID: &str = "youtube-user";

pub fn build_manifest(config: &TenantConfig) -> Manifest {
    let (name_suffix, description_suffix) = if config.low_quota {
        (" • Low-quota", " • Low-quota mode (RSS)")
    } else {
        ("", "")
    };

    Manifest {
        id: ADDON_ID.to_string(),
        version: ADDON_VERSION.to_string(),
        name: format!("{}{}", ADDON_NAME, name_suffix),
        description: format!("User-configured YouTube catalog{}", description_suffix),
        catalogs: vec![CatalogDescriptor {
            kind: CATALOG_TYPE.to_string(),
            id: CATALOG_ID.to_string(),
            name: "YouTube Channels".to_string(),
            extra: vec![ExtraDescriptor {
                name: "search".to_string(),
                is_required: false,
            }],
        }],
        resources: vec!["catalog".into(), "meta".into(), "stream".into()],
        types: vec!["series".into(), "movie".into()],
        id_prefixes: vec![CHANNEL_PREFIX.into(), VIDEO_PREFIX.into()],
        behavior_hints: ManifestHints {
            configurable: true,
            configuration_required: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_quota_label() {
        let manifest = build_manifest(&TenantConfig::new(["@a"], true));
        assert_eq!(manifest.name, "YouTube Universe • Low-quota");
        assert!(manifest.description.ends_with("Low-quota mode (RSS)"));

        let manifest = build_manifest(&TenantConfig::new(["@a"], false));
        assert_eq!(manifest.name, "YouTube Universe");
        assert_eq!(manifest.description, "User-configured YouTube catalog");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(build_manifest(&TenantConfig::default())).unwrap();
        assert_eq!(json["id"], ADDON_ID);
        assert_eq!(json["catalogs"][0]["type"], "series");
        assert_eq!(json["catalogs"][0]["extra"][0]["isRequired"], false);
        assert_eq!(json["idPrefixes"], serde_json::json!(["ytc:", "ytv:"]));
        assert_eq!(json["behaviorHints"]["configurable"], true);
    }
}
