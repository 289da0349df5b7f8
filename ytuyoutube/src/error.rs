//! Error types for the YouTube client

/// Result type alias for YouTube operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to YouTube
///
/// Most lookups (resolution, profiles) absorb these errors and degrade to
/// `None`. They surface only where a caller must distinguish a transport
/// failure from an empty answer: channel search and feed retrieval.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed XML parsing failed
    #[error("XML parsing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Upstream returned an error status
    #[error("API error: {0}")]
    ApiError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidUrl(_)));

        assert_eq!(
            Error::api_error("HTTP 404 for /x").to_string(),
            "API error: HTTP 404 for /x"
        );
        assert_eq!(Error::other("boom").to_string(), "boom");
    }
}
