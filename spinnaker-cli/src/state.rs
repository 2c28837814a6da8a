//! Local state file handling

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load resource state, or `None` when the file does not exist yet
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;

    let state = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

    Ok(Some(state))
}

/// Load resource state that must already exist
pub fn load_existing<T: DeserializeOwned>(path: &Path) -> Result<T> {
    load(path)?.with_context(|| format!("State file not found: {}", path.display()))
}

/// Write resource state as pretty JSON
pub fn save<T: Serialize>(path: &Path, state: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(state).context("Failed to encode state")?;

    std::fs::write(path, content + "\n")
        .with_context(|| format!("Failed to write state file: {}", path.display()))
}

/// Read a document given on the command line
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
