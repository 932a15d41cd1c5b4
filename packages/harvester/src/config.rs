//! Configuration constants and validation functions for the harvester.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{HarvesterError, Result};

/// IATI Registry publisher list, as served for download.
pub const PUBLISHER_LIST_URL: &str = "https://www.iatiregistry.org/publisher/download/xml";

/// Base URL of the IATI codelist downloads (XML flavour).
pub const CODELIST_BASE_URL: &str = "https://iatistandard.org/reference_downloads/203/codelists/downloads/clv3/xml";

/// HTTP request timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// HTTP connect timeout in seconds.
///
/// Registry mirrors can be slow to accept connections; reads are fast once
/// connected.
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 60;

/// Default maximum HTTP response size in bytes (100 MB).
///
/// Large publishers ship activity files of tens of megabytes; anything above
/// this is almost certainly not an IATI document.
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 100 * 1024 * 1024;

/// User agent string identifying this tool.
pub const USER_AGENT: &str = concat!("iatibind/", env!("CARGO_PKG_VERSION"));

/// An http(s) URL.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid regex"));

/// Something that looks like a URL scheme, e.g. `ftp:` or `file:`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]+://").expect("valid regex"));

/// Codelist name: letters and digits, starting with a letter.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CODELIST_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("valid regex"));

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Classify a command-line source as an http(s) URL or a file path.
///
/// # Arguments
/// * `source` - URL or path as given by the user
///
/// # Returns
/// * `Ok(Source)` on success
/// * `Err(HarvesterError::InvalidSource)` for empty input, malformed http(s)
///   URLs, and URLs with any other scheme
///
/// # Examples
/// ```
/// use iatibind_harvester::config::{validate_source, Source};
///
/// assert!(matches!(validate_source("https://example.org/a.xml"), Ok(Source::Url(_))));
/// assert!(matches!(validate_source("data/activities.xml"), Ok(Source::Path(_))));
/// assert!(validate_source("ftp://example.org/a.xml").is_err());
/// ```
pub fn validate_source(source: &str) -> Result<Source> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(HarvesterError::InvalidSource(source.to_string()));
    }

    if URL_PATTERN.is_match(trimmed) {
        return Ok(Source::Url(trimmed.to_string()));
    }

    if SCHEME_PATTERN.is_match(trimmed) {
        return Err(HarvesterError::InvalidSource(source.to_string()));
    }

    Ok(Source::Path(PathBuf::from(trimmed)))
}

/// Validate a codelist name.
///
/// # Examples
/// ```
/// use iatibind_harvester::config::validate_codelist_name;
///
/// assert!(validate_codelist_name("ActivityScope").is_ok());
/// assert!(validate_codelist_name("../etc").is_err());
/// ```
pub fn validate_codelist_name(name: &str) -> Result<()> {
    if CODELIST_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(HarvesterError::InvalidCodelistName(name.to_string()))
    }
}

/// Build the download URL for a named codelist.
///
/// # Panics
/// Debug builds panic if `name` has not been validated.
pub fn codelist_url(name: &str) -> String {
    debug_assert!(
        CODELIST_NAME_PATTERN.is_match(name),
        "name should be validated before calling codelist_url"
    );
    format!("{CODELIST_BASE_URL}/{name}.xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_source_urls() {
        assert_eq!(
            validate_source("https://www.iatiregistry.org/publisher/download/xml").unwrap(),
            Source::Url("https://www.iatiregistry.org/publisher/download/xml".to_string())
        );
        assert!(matches!(
            validate_source("http://localhost:8080/a.xml"),
            Ok(Source::Url(_))
        ));
    }

    #[test]
    fn test_validate_source_paths() {
        assert_eq!(
            validate_source("tests/fixtures/activities.xml").unwrap(),
            Source::Path(PathBuf::from("tests/fixtures/activities.xml"))
        );
        assert!(matches!(validate_source("/tmp/a.xml"), Ok(Source::Path(_))));
        assert!(matches!(validate_source("C:activities.xml"), Ok(Source::Path(_))));
    }

    #[test]
    fn test_validate_source_invalid() {
        assert!(validate_source("").is_err());
        assert!(validate_source("   ").is_err());
        assert!(validate_source("ftp://example.org/a.xml").is_err());
        assert!(validate_source("https:// bad").is_err());
    }

    #[test]
    fn test_validate_codelist_name() {
        assert!(validate_codelist_name("ActivityScope").is_ok());
        assert!(validate_codelist_name("CRSChannelCode").is_ok());
        assert!(validate_codelist_name("").is_err());
        assert!(validate_codelist_name("1Scope").is_err());
        assert!(validate_codelist_name("Activity Scope").is_err());
        assert!(validate_codelist_name("a/b").is_err());
    }

    #[test]
    fn test_codelist_url() {
        assert_eq!(
            codelist_url("ActivityScope"),
            "https://iatistandard.org/reference_downloads/203/codelists/downloads/clv3/xml/ActivityScope.xml"
        );
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Url("https://a.org".to_string()).to_string(), "https://a.org");
        assert_eq!(Source::Path(PathBuf::from("a.xml")).to_string(), "a.xml");
    }
}
