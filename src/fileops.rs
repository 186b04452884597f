//! File and network I/O helpers.
//!
//! These are collaborators, not part of the codec/object model: the codec
//! and inventory types only ever see owned byte buffers. Kept synchronous —
//! there is no concurrent I/O elsewhere in this crate that would justify an
//! async runtime.

use std::path::Path;

use crate::error::InventoryError;

/// Read the full contents of `path` into memory.
pub fn readbytes(path: &Path) -> Result<Vec<u8>, InventoryError> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InventoryError::FileNotFound(path.to_path_buf())
        } else {
            InventoryError::CodecError(e)
        }
    })
}

/// Write `bytes` to `path`, creating or truncating it.
pub fn writebytes(path: &Path, bytes: &[u8]) -> Result<(), InventoryError> {
    std::fs::write(path, bytes).map_err(InventoryError::CodecError)
}

/// Fetch the bytes at `url`. The caller classifies the result as zlib or
/// plaintext; this helper has no knowledge of the inventory format.
pub fn fetch_url(url: &str) -> Result<Vec<u8>, InventoryError> {
    let response = reqwest::blocking::get(url).map_err(|e| InventoryError::Fetch(e.to_string()))?;
    let response = response
        .error_for_status()
        .map_err(|e| InventoryError::Fetch(e.to_string()))?;
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| InventoryError::Fetch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("objects.inv");
        writebytes(&path, b"hello").unwrap();
        assert_eq!(readbytes(&path).unwrap(), b"hello");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.inv");
        let err = readbytes(&path).unwrap_err();
        assert!(matches!(err, InventoryError::FileNotFound(_)));
    }
}
