use std::path::PathBuf;
use thiserror::Error;

/// Every failure mode the inventory codec and object model can raise.
///
/// Parse-time record-line mismatches are never promoted to this type — they
/// are silently skipped by the line parser, per the format's documented
/// tolerance for imperfect upstream data.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("malformed inventory header: {0}")]
    FormatError(String),

    #[error("unsupported inventory format version: {0}")]
    VersionError(String),

    #[error("zlib codec error: {0}")]
    CodecError(#[from] std::io::Error),

    #[error("inventory JSON failed schema validation: {0}")]
    ValidationError(String),

    #[error("{0}")]
    ValueError(String),

    #[error("{0}")]
    TypeError(String),

    #[error("more than one inventory source was supplied")]
    MultipleSourcesError,

    #[error("no such file: {0}")]
    FileNotFound(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Fetch(String),
}
