//! Tests for the `iatibind` binary against local fixtures.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("iati")
        .join(name)
}

fn iatibind() -> Command {
    Command::cargo_bin("iatibind").unwrap()
}

#[test]
fn test_decode_activities_yaml() {
    iatibind()
        .arg("decode")
        .arg(fixture("activities.xml"))
        .args(["--kind", "activities"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("iati_identifier: AA-AAA-123456789-ABC123"))
        .stdout(predicate::str::contains("2.03"))
        .stderr(predicate::str::contains("crs-add"));
}

#[test]
fn test_decode_without_coverage_is_quiet() {
    iatibind()
        .arg("decode")
        .arg(fixture("activities.xml"))
        .args(["--kind", "activities", "--no-coverage"])
        .assert()
        .success()
        .stderr(predicate::str::contains("crs-add").not());
}

#[test]
fn test_decode_publishers_json() {
    iatibind()
        .arg("decode")
        .arg(fixture("publishers.xml"))
        .args(["--kind", "publishers", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "AU-5""#))
        .stdout(predicate::str::contains(r#""datasets_count": 173"#));
}

#[test]
fn test_roundtrip_writes_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.xml");

    iatibind()
        .arg("roundtrip")
        .arg(fixture("codelists/ActivityScope.xml"))
        .args(["--kind", "codelist", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to:"));

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("<?xml"));
    assert!(content.contains(r#"<codelist name="ActivityScope""#));
    assert!(content.contains("<code>3</code>"));
}

#[test]
fn test_roundtrip_to_stdout() {
    iatibind()
        .arg("roundtrip")
        .arg(fixture("publishers.xml"))
        .args(["--kind", "publishers"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<iati-identifier id="NL-KVK-27378529">"#));
}

#[test]
fn test_codelists_summary() {
    iatibind()
        .arg("codelists")
        .arg(fixture("codelists"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ActivityScope: 3 items, 2 active"));
}

#[test]
fn test_wrong_kind_fails() {
    iatibind()
        .arg("decode")
        .arg(fixture("publishers.xml"))
        .args(["--kind", "codelist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to construct Codelist"));
}

#[test]
fn test_unsupported_scheme_fails() {
    iatibind()
        .args(["decode", "ftp://example.org/a.xml", "--kind", "activities"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid source"));
}

#[test]
fn test_missing_file_fails() {
    iatibind()
        .args(["decode", "does-not-exist.xml", "--kind", "activities"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}
