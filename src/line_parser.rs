//! Tokenizes the plaintext inventory body into a header and ordered records.

use regex::bytes::Regex;
use std::sync::OnceLock;

use crate::error::InventoryError;

const SUPPORTED_FORMAT_VERSION: u32 = 2;

/// The four-line header: declared format version, project, and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub format_version: u32,
    pub project: String,
    pub version: String,
}

/// One matched data line, still in byte form. Converting this into a
/// [`crate::data_object::DataObject`] is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub name: Vec<u8>,
    pub domain: Vec<u8>,
    pub role: Vec<u8>,
    pub priority: Vec<u8>,
    pub uri: Vec<u8>,
    pub dispname: Vec<u8>,
}

fn record_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x-u)
            ^(?P<name>\S+)\s+
             (?P<domain>\S+):(?P<role>\S+)\s+
             (?P<priority>-?\d+)\s+
             (?P<uri>\S*)\s+
             (?P<dispname>.+?)\s*$
            ",
        )
        .expect("record regex is a compile-time constant")
    })
}

fn normalize_newlines(body: &[u8]) -> Vec<u8> {
    if !body.contains(&b'\r') {
        return body.to_vec();
    }
    let mut out = Vec::with_capacity(body.len());
    let mut iter = body.iter().peekable();
    while let Some(&b) = iter.next() {
        if b == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        out.push(b);
    }
    out
}

fn header_line<'a>(lines: &mut impl Iterator<Item = &'a [u8]>, prefix: &str) -> Result<String, InventoryError> {
    let line = lines
        .next()
        .ok_or_else(|| InventoryError::FormatError(format!("missing header line: {prefix}")))?;
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end();
    line.strip_prefix(prefix)
        .map(str::trim)
        .map(str::to_string)
        .ok_or_else(|| InventoryError::FormatError(format!("expected line starting with {prefix:?}, got {line:?}")))
}

/// Parse the full plaintext body (header + records) into its header and
/// ordered list of raw records. Lines that don't match the record grammar
/// are silently skipped; only header malformation is fatal.
///
/// The whole buffer must be valid UTF-8 — this is a text format, and it's
/// also what keeps a zlib-compressed wire-format buffer (whose header lines
/// happen to look identical) from being silently accepted as plaintext with
/// zero records: compressed binary tails essentially never decode as UTF-8,
/// and on the rare buffer that does, a non-blank tail that yields no
/// matching record is rejected below too.
pub fn parse(body: &[u8]) -> Result<(Header, Vec<RawRecord>), InventoryError> {
    let normalized = normalize_newlines(body);
    std::str::from_utf8(&normalized)
        .map_err(|e| InventoryError::FormatError(format!("inventory body is not valid UTF-8: {e}")))?;
    let mut lines = normalized.split(|&b| b == b'\n');

    let version_line = header_line(&mut lines, "# Sphinx inventory version ")?;
    let format_version: u32 = version_line
        .parse()
        .map_err(|_| InventoryError::FormatError(format!("non-numeric inventory version: {version_line}")))?;
    if format_version != SUPPORTED_FORMAT_VERSION {
        return Err(InventoryError::FormatError(format!(
            "unsupported inventory version {format_version}, expected {SUPPORTED_FORMAT_VERSION}"
        )));
    }

    let project = header_line(&mut lines, "# Project: ")?;
    let version = header_line(&mut lines, "# Version: ")?;

    // Fourth line just needs to exist; its content is acknowledged, not parsed.
    lines
        .next()
        .ok_or_else(|| InventoryError::FormatError("missing compression notice line".to_string()))?;

    let re = record_regex();
    let mut records = Vec::new();
    let mut saw_non_blank_line = false;
    for line in lines {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        saw_non_blank_line = true;
        if let Some(caps) = re.captures(line) {
            records.push(RawRecord {
                name: caps["name"].to_vec(),
                domain: caps["domain"].to_vec(),
                role: caps["role"].to_vec(),
                priority: caps["priority"].to_vec(),
                uri: caps["uri"].to_vec(),
                dispname: caps["dispname"].to_vec(),
            });
        }
        // Non-matching lines (comments, malformed entries) are skipped
        // without aborting the rest of the parse.
    }

    if saw_non_blank_line && records.is_empty() {
        return Err(InventoryError::FormatError(
            "body has content but no line matched the record grammar".to_string(),
        ));
    }

    Ok((
        Header {
            format_version,
            project,
            version,
        },
        records,
    ))
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
    fn parses_header_and_one_record() {
        let (header, records) = parse(SAMPLE).unwrap();
        assert_eq!(header.format_version, 2);
        assert_eq!(header.project, "p");
        assert_eq!(header.version, "v");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, b"attr.Attribute");
        assert_eq!(r.domain, b"py");
        assert_eq!(r.role, b"class");
        assert_eq!(r.priority, b"1");
        assert_eq!(r.uri, b"api.html#$");
        assert_eq!(r.dispname, b"-");
    }

    #[test]
    fn skips_malformed_and_blank_lines() {
        let mut body = SAMPLE.to_vec();
        body.extend_from_slice(b"\nnot a data line\nslots std:label -1 examples.html#$ Slots\n");
        let (_, records) = parse(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, b"slots");
        assert_eq!(records[1].priority, b"-1");
    }

    #[test]
    fn crlf_is_normalized() {
        let mut crlf = Vec::new();
        for &b in SAMPLE {
            if b == b'\n' {
                crlf.push(b'\r');
            }
            crlf.push(b);
        }
        let (header, records) = parse(&crlf).unwrap();
        assert_eq!(header.project, "p");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn wrong_version_tag_is_format_error() {
        let bad = b"# Sphinx inventory version 1\n# Project: p\n# Version: v\n# zlib.\n";
        let err = parse(bad).unwrap_err();
        assert!(matches!(err, InventoryError::FormatError(_)));
    }

    #[test]
    fn missing_header_is_format_error() {
        let err = parse(b"just a body, no header").unwrap_err();
        assert!(matches!(err, InventoryError::FormatError(_)));
    }

    #[test]
    fn zlib_compressed_tail_is_rejected_not_silently_emptied() {
        let compressed = crate::codec::compress(SAMPLE).unwrap();
        let err = parse(&compressed).unwrap_err();
        assert!(matches!(err, InventoryError::FormatError(_)));
    }

    #[test]
    fn non_blank_unmatched_tail_is_format_error() {
        let mut body = b"# Sphinx inventory version 2\n\
# Project: p\n\
# Version: v\n\
# The remainder of this file is compressed using zlib.\n"
            .to_vec();
        body.extend_from_slice(b"this is not a record line at all\n");
        let err = parse(&body).unwrap_err();
        assert!(matches!(err, InventoryError::FormatError(_)));
    }
}
