use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Publication;

/// Read the résumé text. A missing file is `Error::NotFound`; invalid UTF-8
/// is decoded lossily rather than rejected.
pub fn load_document(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::NotFound(format!("document {}", path.display())));
    }
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            tracing::warn!(path = %path.display(), "document is not valid UTF-8, decoding lossily");
            let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Err(source) => Err(io_error(path, source)),
    }
}

/// Read a JSON array of `{ "title", "link" }` records.
pub fn load_publications(path: &Path) -> Result<Vec<Publication>> {
    if !path.is_file() {
        return Err(Error::NotFound(format!("publications file {}", path.display())));
    }
    let raw = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::InvalidConfig(format!("publications file {}: {}", path.display(), e)))
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io { path: path.display().to_string(), source }
}
