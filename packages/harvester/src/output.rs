//! Writing decoded models and re-encoded documents.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use iatibind_engine::markup::{render_document, Element};

use crate::error::Result;

/// Render a decoded model as a YAML document.
///
/// Output starts with a `---` document marker and has no trailing
/// whitespace on any line.
pub fn render_yaml<T: Serialize>(value: &T) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(value)?;
    let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Render a decoded model as pretty-printed JSON.
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Save an element as a standalone XML document.
///
/// Writes to a temp file next to `path`, syncs it, then renames it into
/// place so a crash never leaves a half-written document.
///
/// # Arguments
/// * `path` - Destination file
/// * `element` - Root element to serialize
pub fn save_xml(path: &Path, element: &Element) -> Result<()> {
    let content = render_document(element)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.xml".to_string());
    let temp_file = dir.join(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Saved XML");
    Ok(())
}
