//! The public façade: project/version metadata, the ordered object list,
//! source-type dispatch, and the plaintext/JSON emission paths.

use std::path::Path;

use serde_json::{json, Value};

use crate::codec;
use crate::data_object::{DataObjStr, LineMode};
use crate::error::InventoryError;
use crate::fileops;
use crate::line_parser;
use crate::schema;

/// Tag identifying how an [`Inventory`] was constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Manual,
    BytesPlaintext,
    BytesZlib,
    FnamePlaintext,
    FnameZlib,
    DictJSON,
    Url,
}

/// An explicit, caller-chosen source for positional (probing) construction.
pub enum Source<'a> {
    Bytes(&'a [u8]),
    Path(&'a Path),
    Url(&'a str),
    Json(Value),
}

/// Named, mutually-exclusive source variants plus `count_error`, mirroring
/// `Inventory(plaintext=, zlib=, fname_plain=, fname_zlib=, url=,
/// dict_json=, count_error=)`.
pub enum NamedSource<'a> {
    Plaintext(&'a [u8]),
    Zlib(&'a [u8]),
    FnamePlain(&'a Path),
    FnameZlib(&'a Path),
    Url(&'a str),
    DictJson(Value, bool),
}

/// The aggregate: project, version, ordered objects, and origin tag.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub project: Option<String>,
    pub version: Option<String>,
    pub objects: Vec<DataObjStr>,
    pub source_type: SourceType,
    /// Opaque caller-populated field round-tripped through `json_dict`.
    pub metadata: Option<Value>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::manual()
    }
}

impl Inventory {
    /// An empty inventory with no project/version, ready for the caller to
    /// populate by hand.
    pub fn manual() -> Self {
        Self {
            project: None,
            version: None,
            objects: Vec::new(),
            source_type: SourceType::Manual,
            metadata: None,
        }
    }

    pub fn count(&self) -> usize {
        self.objects.len()
    }

    fn from_parsed(plaintext: &[u8], source_type: SourceType) -> Result<Self, InventoryError> {
        let (header, raw_records) = line_parser::parse(plaintext)?;
        let mut objects = Vec::with_capacity(raw_records.len());
        for r in raw_records {
            let bytes_obj = crate::data_object::DataObject::new(
                r.name, r.domain, r.role, r.priority, r.uri, r.dispname,
            )?;
            objects.push(bytes_obj.as_text()?);
        }
        Ok(Self {
            project: Some(header.project),
            version: Some(header.version),
            objects,
            source_type,
            metadata: None,
        })
    }

    /// Construct from a plaintext byte buffer (header + uncompressed body).
    pub fn from_bytes_plaintext(bytes: &[u8]) -> Result<Self, InventoryError> {
        Self::from_parsed(bytes, SourceType::BytesPlaintext)
    }

    /// Construct from a zlib-compressed wire-format byte buffer.
    pub fn from_bytes_zlib(bytes: &[u8]) -> Result<Self, InventoryError> {
        let plaintext = codec::decompress(bytes)?;
        Self::from_parsed(&plaintext, SourceType::BytesZlib)
    }

    /// Construct from a file containing the plaintext form.
    pub fn from_file_plaintext<P: AsRef<Path>>(path: P) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InventoryError::FileNotFound(path.to_path_buf()));
        }
        let bytes = fileops::readbytes(path)?;
        Self::from_parsed(&bytes, SourceType::FnamePlaintext)
    }

    /// Construct from a file containing the zlib wire form.
    pub fn from_file_zlib<P: AsRef<Path>>(path: P) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InventoryError::FileNotFound(path.to_path_buf()));
        }
        let bytes = fileops::readbytes(path)?;
        let plaintext = codec::decompress(&bytes)?;
        Self::from_parsed(&plaintext, SourceType::FnameZlib)
    }

    /// Fetch `url`'s bytes and classify them as zlib or plaintext.
    pub fn from_url(url: &str) -> Result<Self, InventoryError> {
        let bytes = fileops::fetch_url(url)?;
        let mut inv = match Self::from_bytes_zlib(&bytes) {
            Ok(inv) => inv,
            Err(_) => Self::from_bytes_plaintext(&bytes)?,
        };
        inv.source_type = SourceType::Url;
        Ok(inv)
    }

    /// Construct from a JSON dict matching [`crate::schema::inventory_schema`].
    ///
    /// If `count_error` is `true` (the default), a mismatch between the
    /// declared `count` and the number of present object entries is fatal.
    /// If `false`, missing indices in `[0, count)` are skipped and the
    /// resulting count reflects what was actually present — but an index at
    /// or beyond the declared `count` is always an error.
    pub fn from_dict_json(value: &Value, count_error: bool) -> Result<Self, InventoryError> {
        schema::validate(value)?;

        let obj = value
            .as_object()
            .ok_or_else(|| InventoryError::ValidationError("root must be an object".to_string()))?;

        let project = obj
            .get("project")
            .and_then(Value::as_str)
            .ok_or_else(|| InventoryError::ValidationError("missing 'project'".to_string()))?
            .to_string();
        let version = obj
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| InventoryError::ValidationError("missing 'version'".to_string()))?
            .to_string();
        let declared_count = obj
            .get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| InventoryError::ValidationError("missing 'count'".to_string()))?
            as usize;

        // Any numeric key at or beyond declared_count is out of range,
        // regardless of count_error.
        for key in obj.keys() {
            if let Ok(idx) = key.parse::<usize>() {
                if idx >= declared_count {
                    return Err(InventoryError::ValueError(format!(
                        "object index {idx} is out of range for declared count {declared_count}"
                    )));
                }
            }
        }

        let mut objects = Vec::new();
        for idx in 0..declared_count {
            let key = idx.to_string();
            match obj.get(&key) {
                Some(entry) => objects.push(data_object_from_json(entry)?),
                None if count_error => {
                    return Err(InventoryError::ValueError(format!(
                        "declared count {declared_count} but object {idx} is missing"
                    )))
                }
                None => continue,
            }
        }

        Ok(Self {
            project: Some(project),
            version: Some(version),
            objects,
            source_type: SourceType::DictJSON,
            metadata: obj.get("metadata").cloned(),
        })
    }

    /// Construct from an explicit, named source — the Rust analogue of
    /// passing exactly one of `plaintext=`/`zlib=`/`fname_plain=`/
    /// `fname_zlib=`/`url=`/`dict_json=`.
    pub fn from_named_source(source: NamedSource) -> Result<Self, InventoryError> {
        match source {
            NamedSource::Plaintext(b) => Self::from_bytes_plaintext(b),
            NamedSource::Zlib(b) => Self::from_bytes_zlib(b),
            NamedSource::FnamePlain(p) => Self::from_file_plaintext(p),
            NamedSource::FnameZlib(p) => Self::from_file_zlib(p),
            NamedSource::Url(u) => Self::from_url(u),
            NamedSource::DictJson(v, count_error) => Self::from_dict_json(&v, count_error),
        }
    }

    /// Probe an ambiguous positional source in the fixed order spec'd for
    /// `Inventory(source=...)`: bytes-as-plaintext, bytes-as-zlib,
    /// file-as-plaintext, file-as-zlib, dict-as-JSON, URL.
    ///
    /// Probing is side-effect-free on failure: each attempt only reads
    /// already-owned buffers or a file that's re-opened fresh per attempt.
    pub fn from_source(source: Source) -> Result<Self, InventoryError> {
        match source {
            Source::Bytes(b) => Self::from_bytes_plaintext(b)
                .or_else(|_| Self::from_bytes_zlib(b))
                .map_err(|_| InventoryError::TypeError("invalid source".to_string())),
            Source::Path(p) => {
                if !p.exists() {
                    return Err(InventoryError::FileNotFound(p.to_path_buf()));
                }
                Self::from_file_plaintext(p)
                    .or_else(|_| Self::from_file_zlib(p))
                    .map_err(|_| InventoryError::TypeError("invalid source".to_string()))
            }
            Source::Json(v) => Self::from_dict_json(&v, true),
            Source::Url(u) => Self::from_url(u),
        }
    }

    /// Emit the full plaintext form: four-line header then one record line
    /// per object, in order, terminated by a single trailing newline.
    pub fn data_file(&self, mode: LineMode) -> Result<String, InventoryError> {
        let project = self
            .project
            .as_deref()
            .ok_or_else(|| InventoryError::ValueError("inventory has no project set".to_string()))?;
        let version = self
            .version
            .as_deref()
            .ok_or_else(|| InventoryError::ValueError("inventory has no version set".to_string()))?;

        let mut out = String::new();
        out.push_str("# Sphinx inventory version 2\n");
        out.push_str(&format!("# Project: {project}\n"));
        out.push_str(&format!("# Version: {version}\n"));
        out.push_str("# The remainder of this file is compressed using zlib.\n");
        for obj in &self.objects {
            out.push_str(&obj.data_line(mode));
            out.push('\n');
        }
        Ok(out)
    }

    /// Emit the structured dictionary described by
    /// [`crate::schema::inventory_schema`].
    pub fn json_dict(&self, mode: LineMode) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("project".to_string(), json!(self.project));
        map.insert("version".to_string(), json!(self.version));
        map.insert("count".to_string(), json!(self.count()));
        for (idx, obj) in self.objects.iter().enumerate() {
            let mut entry = serde_json::Map::new();
            entry.insert("name".to_string(), json!(obj.name));
            entry.insert("domain".to_string(), json!(obj.domain));
            entry.insert("role".to_string(), json!(obj.role));
            entry.insert("priority".to_string(), json!(obj.priority));
            entry.insert("uri".to_string(), json!(obj.resolved_uri(mode)));
            entry.insert("dispname".to_string(), json!(obj.resolved_dispname(mode)));
            map.insert(idx.to_string(), Value::Object(entry));
        }
        if let Some(metadata) = &self.metadata {
            map.insert("metadata".to_string(), metadata.clone());
        }
        Value::Object(map)
    }

    /// Fuzzy-rank object reference strings against `query`, using the
    /// default score threshold. See [`crate::suggest::suggest`] for the
    /// scoring contract.
    pub fn suggest(
        &self,
        query: &str,
        with_index: bool,
        with_score: bool,
    ) -> Vec<crate::suggest::Suggestion> {
        crate::suggest::suggest(self, query, with_index, with_score, crate::suggest::DEFAULT_THRESHOLD)
    }

    pub fn suggest_with_threshold(
        &self,
        query: &str,
        with_index: bool,
        with_score: bool,
        threshold: f64,
    ) -> Vec<crate::suggest::Suggestion> {
        crate::suggest::suggest(self, query, with_index, with_score, threshold)
    }
}

/// Builder enforcing "exactly one source, or none": mutually-exclusive
/// setters for each source kind, checked at `build()`.
#[derive(Default)]
pub struct InventoryBuilder<'a> {
    source: Option<Source<'a>>,
    plaintext: Option<&'a [u8]>,
    zlib: Option<&'a [u8]>,
    fname_plain: Option<&'a Path>,
    fname_zlib: Option<&'a Path>,
    url: Option<&'a str>,
    dict_json: Option<Value>,
    count_error: Option<bool>,
}

impl<'a> InventoryBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: Source<'a>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn plaintext(mut self, bytes: &'a [u8]) -> Self {
        self.plaintext = Some(bytes);
        self
    }

    pub fn zlib(mut self, bytes: &'a [u8]) -> Self {
        self.zlib = Some(bytes);
        self
    }

    pub fn fname_plain(mut self, path: &'a Path) -> Self {
        self.fname_plain = Some(path);
        self
    }

    pub fn fname_zlib(mut self, path: &'a Path) -> Self {
        self.fname_zlib = Some(path);
        self
    }

    pub fn url(mut self, url: &'a str) -> Self {
        self.url = Some(url);
        self
    }

    pub fn dict_json(mut self, value: Value) -> Self {
        self.dict_json = Some(value);
        self
    }

    pub fn count_error(mut self, value: bool) -> Self {
        self.count_error = Some(value);
        self
    }

    pub fn build(self) -> Result<Inventory, InventoryError> {
        let count_error = self.count_error.unwrap_or(true);
        let supplied = [
            self.source.is_some(),
            self.plaintext.is_some(),
            self.zlib.is_some(),
            self.fname_plain.is_some(),
            self.fname_zlib.is_some(),
            self.url.is_some(),
            self.dict_json.is_some(),
        ]
        .into_iter()
        .filter(|&b| b)
        .count();

        if supplied > 1 {
            return Err(InventoryError::MultipleSourcesError);
        }

        if let Some(source) = self.source {
            return Inventory::from_source(source);
        }
        if let Some(b) = self.plaintext {
            return Inventory::from_named_source(NamedSource::Plaintext(b));
        }
        if let Some(b) = self.zlib {
            return Inventory::from_named_source(NamedSource::Zlib(b));
        }
        if let Some(p) = self.fname_plain {
            return Inventory::from_named_source(NamedSource::FnamePlain(p));
        }
        if let Some(p) = self.fname_zlib {
            return Inventory::from_named_source(NamedSource::FnameZlib(p));
        }
        if let Some(u) = self.url {
            return Inventory::from_named_source(NamedSource::Url(u));
        }
        if let Some(v) = self.dict_json {
            return Inventory::from_named_source(NamedSource::DictJson(v, count_error));
        }

        Ok(Inventory::manual())
    }
}

fn data_object_from_json(entry: &Value) -> Result<DataObjStr, InventoryError> {
    let obj = entry
        .as_object()
        .ok_or_else(|| InventoryError::ValidationError("object entry must be a JSON object".to_string()))?;
    let field = |name: &str| -> Result<String, InventoryError> {
        obj.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| InventoryError::ValidationError(format!("object entry missing field: {name}")))
    };
    crate::data_object::DataObject::new(
        field("name")?,
        field("domain")?,
        field("role")?,
        field("priority")?,
        field("uri")?,
        field("dispname")?,
    )
}
