//! Bring documents in from the network or disk and decode them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use reqwest::blocking::Client;

use iatibind_engine::markup::{self, Element};
use iatibind_engine::{DecodeOptions, Decoded, Decoder, XmlModel};

use crate::config::{Source, DEFAULT_MAX_RESPONSE_SIZE};
use crate::error::{HarvesterError, Result};
use crate::http::{create_client, download_bytes};
use crate::vocabulary::Codelist;

/// Download and parse an XML document.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - Document URL
///
/// # Returns
/// Root element of the document
pub fn fetch_element(client: &Client, url: &str) -> Result<Element> {
    let bytes = download_bytes(client, url, DEFAULT_MAX_RESPONSE_SIZE)?;
    Ok(markup::parse_bytes(&bytes)?)
}

/// Download a document and decode its root as `T`.
pub fn fetch_model<T: XmlModel>(
    client: &Client,
    url: &str,
    options: DecodeOptions,
) -> Result<Decoded<T>> {
    let element = fetch_element(client, url)?;
    Ok(Decoder::new(options).decode(&element)?)
}

/// Read a document from disk and decode its root as `T`.
pub fn load_file<T: XmlModel>(path: &Path, options: DecodeOptions) -> Result<Decoded<T>> {
    tracing::debug!(path = %path.display(), model = T::schema().type_name(), "Loading file");
    let bytes = fs::read(path)?;
    let element = markup::parse_bytes(&bytes)?;
    Ok(Decoder::new(options).decode(&element)?)
}

/// Decode a document from either kind of [`Source`].
///
/// A client is only created for URL sources.
pub fn load_source<T: XmlModel>(source: &Source, options: DecodeOptions) -> Result<Decoded<T>> {
    match source {
        Source::Url(url) => {
            let client = create_client()?;
            fetch_model(&client, url, options)
        }
        Source::Path(path) => load_file(path, options),
    }
}

/// Load every `*.xml` codelist in a directory, keyed by file stem.
///
/// The first file that fails stops the load; its path is part of the error.
pub fn load_codelists(dir: &Path) -> Result<BTreeMap<String, Decoded<Codelist>>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "xml"))
        .collect();
    paths.sort();

    let mut codelists = BTreeMap::new();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let decoded = Codelist::from_file(&path).map_err(|e| HarvesterError::Load {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        codelists.insert(stem.to_string(), decoded);
    }

    tracing::info!(dir = %dir.display(), count = codelists.len(), "Loaded codelists");
    Ok(codelists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::ReportingOrg;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CODELIST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<codelist name="ActivityScope" xml:lang="en" complete="1" embedded="1">
  <metadata><name><narrative>Activity Scope</narrative></name></metadata>
  <codelist-items>
    <codelist-item><code>1</code><name><narrative>Global</narrative></name></codelist-item>
  </codelist-items>
</codelist>"#;

    #[test]
    fn test_load_file_decodes_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("org.xml");
        fs::write(
            &path,
            r#"<reporting-org ref="NL-KVK-1" type="10" foo="bar"><narrative>Org</narrative></reporting-org>"#,
        )
        .unwrap();

        let decoded: Decoded<ReportingOrg> = load_file(&path, DecodeOptions::default()).unwrap();
        assert_eq!(decoded.value.ref_, "NL-KVK-1");
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.warnings[0].name, "foo");

        let quiet: Decoded<ReportingOrg> = load_file(
            &path,
            DecodeOptions {
                check_coverage: false,
            },
        )
        .unwrap();
        assert!(quiet.warnings.is_empty());
    }

    #[test]
    fn test_load_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result: Result<Decoded<ReportingOrg>> =
            load_file(&dir.path().join("absent.xml"), DecodeOptions::default());
        assert!(matches!(result, Err(HarvesterError::Io(_))));
    }

    #[test]
    fn test_load_codelists_keys_by_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ActivityScope.xml"), CODELIST).unwrap();
        fs::write(dir.path().join("README.txt"), "not a codelist").unwrap();

        let codelists = load_codelists(dir.path()).unwrap();
        assert_eq!(codelists.keys().collect::<Vec<_>>(), ["ActivityScope"]);
        assert_eq!(codelists["ActivityScope"].value.name, "ActivityScope");
    }

    #[test]
    fn test_load_codelists_reports_failing_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Broken.xml"), "<codelist").unwrap();

        let err = load_codelists(dir.path()).unwrap_err();
        match err {
            HarvesterError::Load { path, .. } => assert!(path.ends_with("Broken.xml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
