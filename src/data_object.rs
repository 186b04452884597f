//! The six-field inventory record, parameterized over its payload encoding.
//!
//! A single logical record exists in two representations — raw bytes and
//! decoded text — that must always agree under UTF-8. Rather than
//! duplicating the type, [`DataObject`] is generic over an [`Encoding`]
//! marker; [`DataObjBytes`] and [`DataObjStr`] are its two instantiations.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::InventoryError;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Bytes {}
    impl Sealed for super::Text {}
}

/// Marker type for the byte-string encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bytes;

/// Marker type for the decoded-text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Text;

/// A [`DataObject`] payload encoding: either [`Bytes`] (`Vec<u8>` fields) or
/// [`Text`] (`String` fields).
pub trait Encoding: sealed::Sealed {
    type Value: Clone + PartialEq + std::fmt::Debug;

    fn from_field_str(s: &str) -> Self::Value;
    fn field_as_display(v: &Self::Value) -> String;
    fn field_eq_str(v: &Self::Value, s: &str) -> bool;
}

impl Encoding for Bytes {
    type Value = Vec<u8>;

    fn from_field_str(s: &str) -> Self::Value {
        s.as_bytes().to_vec()
    }

    fn field_as_display(v: &Self::Value) -> String {
        String::from_utf8_lossy(v).into_owned()
    }

    fn field_eq_str(v: &Self::Value, s: &str) -> bool {
        v.as_slice() == s.as_bytes()
    }
}

impl Encoding for Text {
    type Value = String;

    fn from_field_str(s: &str) -> Self::Value {
        s.to_string()
    }

    fn field_as_display(v: &Self::Value) -> String {
        v.clone()
    }

    fn field_eq_str(v: &Self::Value, s: &str) -> bool {
        v == s
    }
}

/// The six required field names, in canonical order.
pub const FIELD_NAMES: [&str; 6] = ["name", "domain", "role", "priority", "uri", "dispname"];

/// How [`DataObject::data_line`] should render the `uri`/`dispname`
/// abbreviations. `Expand` and `Contract` are mutually exclusive by
/// construction — unlike the keyword-argument form this is adapted from,
/// the type system rules out requesting both at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    AsIs,
    Expand,
    Contract,
}

/// One inventory record: `name`, `domain`, `role`, `priority`, `uri`,
/// `dispname`, all held in the same [`Encoding`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DataObject<E: Encoding> {
    pub name: E::Value,
    pub domain: E::Value,
    pub role: E::Value,
    pub priority: E::Value,
    pub uri: E::Value,
    pub dispname: E::Value,
    _encoding: PhantomData<E>,
}

pub type DataObjBytes = DataObject<Bytes>;
pub type DataObjStr = DataObject<Text>;

/// Per-field overrides for [`DataObject::evolve`]; `None` means "keep the
/// existing value". Constructed with [`Default::default`] and the
/// individual setters, or field-literally.
#[derive(Default)]
pub struct Overrides<E: Encoding> {
    pub name: Option<E::Value>,
    pub domain: Option<E::Value>,
    pub role: Option<E::Value>,
    pub priority: Option<E::Value>,
    pub uri: Option<E::Value>,
    pub dispname: Option<E::Value>,
}

impl<E: Encoding> DataObject<E> {
    /// Build a record directly from its six field values. All fields must
    /// be non-empty, per the format's invariants.
    pub fn new(
        name: E::Value,
        domain: E::Value,
        role: E::Value,
        priority: E::Value,
        uri: E::Value,
        dispname: E::Value,
    ) -> Result<Self, InventoryError> {
        let obj = Self {
            name,
            domain,
            role,
            priority,
            uri,
            dispname,
            _encoding: PhantomData,
        };
        obj.validate_nonempty()?;
        Ok(obj)
    }

    fn validate_nonempty(&self) -> Result<(), InventoryError> {
        let fields: [(&str, &E::Value); 6] = [
            ("name", &self.name),
            ("domain", &self.domain),
            ("role", &self.role),
            ("priority", &self.priority),
            ("uri", &self.uri),
            ("dispname", &self.dispname),
        ];
        for (field, value) in fields {
            if E::field_as_display(value).is_empty() {
                return Err(InventoryError::TypeError(format!(
                    "field '{field}' must be non-empty"
                )));
            }
        }
        Ok(())
    }

    /// Build a record from a field-name -> value map, the way a record
    /// constructed from arbitrary (e.g. deserialized) input would arrive.
    /// Every one of [`FIELD_NAMES`] must be present, and no others.
    pub fn from_map(mut fields: HashMap<String, E::Value>) -> Result<Self, InventoryError> {
        if fields.len() != FIELD_NAMES.len() {
            return Err(InventoryError::TypeError(format!(
                "expected exactly {} fields, got {}",
                FIELD_NAMES.len(),
                fields.len()
            )));
        }
        let mut take = |name: &str| {
            fields
                .remove(name)
                .ok_or_else(|| InventoryError::TypeError(format!("missing field: {name}")))
        };
        let name = take("name")?;
        let domain = take("domain")?;
        let role = take("role")?;
        let priority = take("priority")?;
        let uri = take("uri")?;
        let dispname = take("dispname")?;
        Self::new(name, domain, role, priority, uri, dispname)
    }

    /// Flat field-name -> value map in this object's own encoding.
    pub fn json_dict(&self) -> HashMap<&'static str, E::Value> {
        let mut map = HashMap::with_capacity(6);
        map.insert("name", self.name.clone());
        map.insert("domain", self.domain.clone());
        map.insert("role", self.role.clone());
        map.insert("priority", self.priority.clone());
        map.insert("uri", self.uri.clone());
        map.insert("dispname", self.dispname.clone());
        map
    }

    /// A new record equal to `self` except for the fields named in
    /// `overrides`.
    pub fn evolve(&self, overrides: Overrides<E>) -> Self {
        Self {
            name: overrides.name.unwrap_or_else(|| self.name.clone()),
            domain: overrides.domain.unwrap_or_else(|| self.domain.clone()),
            role: overrides.role.unwrap_or_else(|| self.role.clone()),
            priority: overrides.priority.unwrap_or_else(|| self.priority.clone()),
            uri: overrides.uri.unwrap_or_else(|| self.uri.clone()),
            dispname: overrides.dispname.unwrap_or_else(|| self.dispname.clone()),
            _encoding: PhantomData,
        }
    }

    /// `uri` as it would render in `mode`, without building a full line.
    pub fn resolved_uri(&self, mode: LineMode) -> E::Value {
        match mode {
            LineMode::AsIs => self.uri.clone(),
            LineMode::Expand => self.expand_uri(),
            LineMode::Contract => self.contract_uri(),
        }
    }

    /// `dispname` as it would render in `mode`, without building a full line.
    pub fn resolved_dispname(&self, mode: LineMode) -> E::Value {
        match mode {
            LineMode::AsIs => self.dispname.clone(),
            LineMode::Expand => self.expand_dispname(),
            LineMode::Contract => self.contract_dispname(),
        }
    }

    /// `uri` with a trailing `$` expanded to the literal `name`.
    fn expand_uri(&self) -> E::Value {
        let uri = E::field_as_display(&self.uri);
        if let Some(stripped) = uri.strip_suffix('$') {
            E::from_field_str(&format!("{stripped}{}", E::field_as_display(&self.name)))
        } else {
            self.uri.clone()
        }
    }

    /// `uri` with a trailing occurrence of `name` contracted to `$`.
    fn contract_uri(&self) -> E::Value {
        let uri = E::field_as_display(&self.uri);
        let name = E::field_as_display(&self.name);
        if !name.is_empty() && uri.ends_with(name.as_str()) {
            let prefix = &uri[..uri.len() - name.len()];
            E::from_field_str(&format!("{prefix}$"))
        } else {
            self.uri.clone()
        }
    }

    /// `dispname`, with a standalone `-` expanded to `name`.
    fn expand_dispname(&self) -> E::Value {
        if E::field_eq_str(&self.dispname, "-") {
            self.name.clone()
        } else {
            self.dispname.clone()
        }
    }

    /// `dispname`, contracted to `-` if it equals `name`.
    fn contract_dispname(&self) -> E::Value {
        if E::field_as_display(&self.dispname) == E::field_as_display(&self.name) {
            E::from_field_str("-")
        } else {
            self.dispname.clone()
        }
    }

    /// Render this record as a single data line in the requested mode.
    pub fn data_line(&self, mode: LineMode) -> E::Value {
        let uri = self.resolved_uri(mode);
        let dispname = self.resolved_dispname(mode);
        let line = format!(
            "{} {}:{} {} {} {}",
            E::field_as_display(&self.name),
            E::field_as_display(&self.domain),
            E::field_as_display(&self.role),
            E::field_as_display(&self.priority),
            E::field_as_display(&uri),
            E::field_as_display(&dispname),
        );
        E::from_field_str(&line)
    }

    /// Convenience wrapper over [`data_line`](Self::data_line) that accepts
    /// the boolean `expand`/`contract` flags directly, raising `ValueError`
    /// if both are set — the literal mutual-exclusivity check the mode enum
    /// otherwise makes unrepresentable.
    pub fn data_line_with_flags(
        &self,
        expand: bool,
        contract: bool,
    ) -> Result<E::Value, InventoryError> {
        let mode = match (expand, contract) {
            (true, true) => {
                return Err(InventoryError::ValueError(
                    "cannot both expand and contract a data line".to_string(),
                ))
            }
            (true, false) => LineMode::Expand,
            (false, true) => LineMode::Contract,
            (false, false) => LineMode::AsIs,
        };
        Ok(self.data_line(mode))
    }
}

impl DataObjBytes {
    /// Decode this byte-encoded record into its text sibling. Fails if any
    /// field is not valid UTF-8.
    pub fn as_text(&self) -> Result<DataObjStr, InventoryError> {
        let decode = |v: &Vec<u8>| -> Result<String, InventoryError> {
            String::from_utf8(v.clone())
                .map_err(|e| InventoryError::TypeError(format!("invalid UTF-8 in field: {e}")))
        };
        Ok(DataObjStr {
            name: decode(&self.name)?,
            domain: decode(&self.domain)?,
            role: decode(&self.role)?,
            priority: decode(&self.priority)?,
            uri: decode(&self.uri)?,
            dispname: decode(&self.dispname)?,
            _encoding: PhantomData,
        })
    }
}

impl DataObjStr {
    /// Encode this text record as bytes. Always succeeds: `String` is
    /// always valid UTF-8.
    pub fn as_bytes(&self) -> DataObjBytes {
        DataObjBytes {
            name: self.name.as_bytes().to_vec(),
            domain: self.domain.as_bytes().to_vec(),
            role: self.role.as_bytes().to_vec(),
            priority: self.priority.as_bytes().to_vec(),
            uri: self.uri.as_bytes().to_vec(),
            dispname: self.dispname.as_bytes().to_vec(),
            _encoding: PhantomData,
        }
    }
}
