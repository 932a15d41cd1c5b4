//! Error types for the harvester.
//!
//! Engine failures are wrapped as-is so callers can still match on the
//! binding taxonomy; everything else is about getting bytes in and out.

use thiserror::Error;

use iatibind_engine::{BindError, MarkupError};

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Neither an http(s) URL nor a usable path.
    #[error("Invalid source: '{0}'. Expected an http(s) URL or a file path")]
    InvalidSource(String),

    /// Codelist names are alphanumeric identifiers such as `ActivityScope`.
    #[error("Invalid codelist name: '{0}'. Expected letters and digits only (e.g., ActivityScope)")]
    InvalidCodelistName(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Transient failures on every attempt.
    #[error("Download failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Response body above the configured limit.
    #[error("Response from {url} is {size} bytes, exceeding the limit of {limit} bytes")]
    ResponseTooLarge { url: String, size: u64, limit: u64 },

    /// Decoding or encoding failed.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Loading a file in a codelist directory failed.
    #[error("Failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: Box<HarvesterError>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl From<MarkupError> for HarvesterError {
    fn from(err: MarkupError) -> Self {
        HarvesterError::Bind(BindError::Markup(err))
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarvesterError::InvalidSource("ftp://x".to_string());
        assert!(err.to_string().contains("ftp://x"));
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn test_response_too_large_display() {
        let err = HarvesterError::ResponseTooLarge {
            url: "https://example.org/a.xml".to_string(),
            size: 2048,
            limit: 1024,
        };
        assert_eq!(
            err.to_string(),
            "Response from https://example.org/a.xml is 2048 bytes, exceeding the limit of 1024 bytes"
        );
    }

    #[test]
    fn test_markup_error_wraps_into_bind() {
        let err: HarvesterError = MarkupError::InvalidName("a b".to_string()).into();
        assert!(matches!(err, HarvesterError::Bind(BindError::Markup(_))));
    }

    #[test]
    fn test_load_error_names_path() {
        let err = HarvesterError::Load {
            path: "codelists/Broken.xml".to_string(),
            source: Box::new(HarvesterError::InvalidSource("x".to_string())),
        };
        assert!(err.to_string().starts_with("Failed to load codelists/Broken.xml:"));
    }
}
