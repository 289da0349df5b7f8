//! Tenant configuration and its opaque URL token.
//!
//! A tenant is nothing more than an ordered list of raw channel identifiers
//! plus the low-quota flag. The whole record is serialized to JSON and
//! base64url-encoded (no padding) so it can travel as a single path segment:
//! the server keeps no session.
//!
//! The token carries no MAC. Anyone holding it can read and alter it, which
//! only changes what *their own* catalog lists.

use base64::{
    alphabet,
    engine::{general_purpose::URL_SAFE_NO_PAD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of channels kept in a tenant configuration
pub const MAX_CHANNELS: usize = 100;

// Accepts tokens whether or not a client re-added '=' padding
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Per-tenant configuration carried inside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    pub channels: Vec<String>,
    #[serde(rename = "lowQuota")]
    pub low_quota: bool,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            low_quota: true,
        }
    }
}

impl TenantConfig {
    /// Builds a configuration, keeping at most [`MAX_CHANNELS`] channels
    pub fn new<I, S>(channels: I, low_quota: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: channels
                .into_iter()
                .take(MAX_CHANNELS)
                .map(Into::into)
                .collect(),
            low_quota,
        }
    }

    /// Canonical form: what `decode(encode(self))` returns
    pub fn normalized(&self) -> Self {
        Self {
            channels: self.channels.iter().take(MAX_CHANNELS).cloned().collect(),
            low_quota: self.low_quota,
        }
    }

    /// Builds the configuration from an arbitrary JSON value
    ///
    /// Returns `None` unless `value` is an object. Non-array `channels`
    /// yields an empty list; strings are kept, numbers are stringified and
    /// anything else is dropped. `lowQuota` is `true` unless it is the
    /// literal `false`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let channels = match object.get("channels") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .take(MAX_CHANNELS)
                .collect(),
            _ => Vec::new(),
        };

        let low_quota = !matches!(object.get("lowQuota"), Some(Value::Bool(false)));

        Some(Self {
            channels,
            low_quota,
        })
    }
}

/// Encodes a configuration into its URL-safe token
///
/// The output only contains `[A-Za-z0-9_-]`.
pub fn encode(config: &TenantConfig) -> String {
    let normalized = config.normalized();
    // Serializing a struct of strings and a bool cannot fail
    let json = serde_json::to_vec(&normalized).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decodes a token, `None` when it is malformed in any way
pub fn decode(token: &str) -> Option<TenantConfig> {
    let bytes = LENIENT_URL_SAFE.decode(token.trim()).ok()?;
    let value: Value = serde_json::from_slice(&bytes).ok()?;
    TenantConfig::from_json(&value)
}

/// Encodes arbitrary text (used for raw identifiers in catalog ids)
pub fn encode_text(text: &str) -> String {
    URL_SAFE_NO_PAD.encode(text.as_bytes())
}

/// Decodes text produced by [`encode_text`], `None` unless valid UTF-8
pub fn decode_text(encoded: &str) -> Option<String> {
    let bytes = LENIENT_URL_SAFE.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}
