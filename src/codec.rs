//! Header-preserving zlib codec for the inventory wire format.
//!
//! A wire-format inventory is a four-line plaintext header followed by a
//! zlib-compressed body. `compress` and `decompress` locate the boundary
//! between the two (the end of the fourth `\n`) and transform only the tail,
//! leaving the header bytes untouched.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::InventoryError;

const HEADER_LINE_COUNT: usize = 4;

/// Sphinx inventory format version this codec implements. Any other
/// announced version is rejected with `VersionError`.
const SUPPORTED_FORMAT_VERSION: &str = "2";

/// Split `data` into `(header, tail)` at the byte following the fourth `\n`.
///
/// Returns `FormatError` if fewer than four newlines are present.
fn split_header(data: &[u8]) -> Result<(&[u8], &[u8]), InventoryError> {
    let mut seen = 0usize;
    for (i, &b) in data.iter().enumerate() {
        if b == b'\n' {
            seen += 1;
            if seen == HEADER_LINE_COUNT {
                return Ok(data.split_at(i + 1));
            }
        }
    }
    Err(InventoryError::FormatError(format!(
        "expected {HEADER_LINE_COUNT} header lines, found {seen}"
    )))
}

/// Confirm the header's first line announces the supported format version.
///
/// Raises `VersionError`, distinct from the `FormatError` the line parser
/// raises for the same condition when it re-checks the header in full.
fn check_format_version(header: &[u8]) -> Result<(), InventoryError> {
    let first_line = header
        .split(|&b| b == b'\n')
        .next()
        .unwrap_or_default();
    let first_line = String::from_utf8_lossy(first_line);
    let first_line = first_line.trim();

    let version = first_line
        .strip_prefix("# Sphinx inventory version ")
        .ok_or_else(|| {
            InventoryError::VersionError(format!("unrecognized header line: {first_line}"))
        })?;

    if version != SUPPORTED_FORMAT_VERSION {
        return Err(InventoryError::VersionError(format!(
            "unsupported inventory version {version}, only version {SUPPORTED_FORMAT_VERSION} is implemented"
        )));
    }

    Ok(())
}

/// Compress `plaintext` (full plaintext form, header + uncompressed body)
/// into the wire form (same header, zlib-compressed body).
pub fn compress(plaintext: &[u8]) -> Result<Vec<u8>, InventoryError> {
    let (header, body) = split_header(plaintext)?;
    check_format_version(header)?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body)?;
    let compressed = encoder.finish()?;

    let mut wire = Vec::with_capacity(header.len() + compressed.len());
    wire.extend_from_slice(header);
    wire.extend_from_slice(&compressed);
    Ok(wire)
}

/// Decompress `wire` (header + zlib body) into the full plaintext form.
pub fn decompress(wire: &[u8]) -> Result<Vec<u8>, InventoryError> {
    let (header, tail) = split_header(wire)?;
    check_format_version(header)?;

    let mut decoder = ZlibDecoder::new(tail);
    let mut body = Vec::new();
    decoder.read_to_end(&mut body)?;

    let mut plaintext = Vec::with_capacity(header.len() + body.len());
    plaintext.extend_from_slice(header);
    plaintext.extend_from_slice(&body);
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"# Sphinx inventory version 2\n\
# Project: p\n\
# Version: v\n\
# The remainder of this file is compressed using zlib.\n\
attr.Attribute py:class 1 api.html#$ -\n";

    #[test]
    fn round_trip_compress_then_decompress() {
        let wire = compress(SAMPLE).unwrap();
        let plain = decompress(&wire).unwrap();
        assert_eq!(plain, SAMPLE);
    }

    #[test]
    fn header_bytes_survive_unchanged() {
        let wire = compress(SAMPLE).unwrap();
        assert!(wire.starts_with(b"# Sphinx inventory version 2\n"));
    }

    #[test]
    fn too_few_header_lines_is_format_error() {
        let err = compress(b"only one line\n").unwrap_err();
        assert!(matches!(err, InventoryError::FormatError(_)));
    }

    #[test]
    fn wrong_version_is_version_error() {
        let bad = b"# Sphinx inventory version 1\n# Project: p\n# Version: v\n# zlib.\nbody\n";
        let err = compress(bad).unwrap_err();
        assert!(matches!(err, InventoryError::VersionError(_)));
    }

    #[test]
    fn decompressing_plaintext_body_fails() {
        // Valid header, but the tail isn't actually zlib-compressed.
        let err = decompress(SAMPLE).unwrap_err();
        assert!(matches!(err, InventoryError::CodecError(_)));
    }
}
