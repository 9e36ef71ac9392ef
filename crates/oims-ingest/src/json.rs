//! JSON document reading and writing.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{IngestError, Result};

/// Read and deserialize a JSON document (mapping, schema or output).
pub fn read_json_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_str(&text).map_err(|source| IngestError::JsonParse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded JSON document");
    Ok(document)
}

/// Serialize a document to pretty-printed JSON.
pub fn to_pretty_json<T: Serialize>(document: &T) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|source| IngestError::JsonSerialize { source })
}

/// Write a document as pretty-printed JSON, creating parent directories.
pub fn write_json_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let text = to_pretty_json(document)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Wrote JSON document");
    Ok(())
}
