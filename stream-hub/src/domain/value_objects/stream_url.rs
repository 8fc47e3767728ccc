//! Source/target URL value object.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

/// An optional stream endpoint.
///
/// Empty means "not configured"; anything else must be an absolute URL
/// (`rtmp://`, `srt://`, `https://`, ... are all accepted).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamUrl(String);

impl StreamUrl {
    /// Validate `url`. `field` names the input in error messages.
    pub fn new(field: &str, url: impl Into<String>) -> Result<Self, Error> {
        let url = url.into();
        let trimmed = url.trim();

        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(Error::validation(format!(
                "{} cannot contain whitespace",
                field
            )));
        }

        let parsed = Url::parse(trimmed)
            .map_err(|e| Error::validation(format!("{} '{}' is not a valid URL: {}", field, trimmed, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "{} '{}' must be a hierarchical URL",
                field, trimmed
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<StreamUrl> for String {
    fn from(url: StreamUrl) -> Self {
        url.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_allowed() {
        let url = StreamUrl::new("source_url", "").unwrap();
        assert!(url.is_empty());
    }

    #[test]
    fn test_media_schemes_are_accepted() {
        for raw in [
            "rtmp://ingest.example.com/live/key",
            "srt://10.0.0.2:9000",
            "https://cdn.example.com/high.m3u8",
        ] {
            assert_eq!(StreamUrl::new("target_url", raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_relative_or_opaque_urls_are_rejected() {
        assert!(StreamUrl::new("source_url", "/streams/a.m3u8").is_err());
        assert!(StreamUrl::new("source_url", "mailto:ops@example.com").is_err());
        assert!(StreamUrl::new("source_url", "https://exa mple.com").is_err());
    }

    #[test]
    fn test_error_names_field() {
        let err = StreamUrl::new("target_url", "not a url").unwrap_err();
        assert!(err.to_string().contains("target_url"));
    }
}
