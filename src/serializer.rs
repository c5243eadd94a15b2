//! Serialization of documentation bundles to YAML or JSON.

use crate::document::DocumentBundle;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a documentation bundle to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(bundle: &DocumentBundle) -> Result<String> {
    debug!("Serializing documentation bundle to YAML");
    serde_yaml::to_string(bundle).context("Failed to serialize documentation bundle to YAML")
}

/// Serializes a documentation bundle to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(bundle: &DocumentBundle) -> Result<String> {
    debug!("Serializing documentation bundle to JSON");
    serde_json::to_string_pretty(bundle)
        .context("Failed to serialize documentation bundle to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
