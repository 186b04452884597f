//! JSON Schema for the inventory dict form, validated with the
//! `jsonschema` crate.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::{json, Value};

use crate::error::InventoryError;

fn object_entry_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "domain", "role", "priority", "uri", "dispname"],
        "properties": {
            "name": { "type": "string" },
            "domain": { "type": "string" },
            "role": { "type": "string" },
            "priority": { "type": "string" },
            "uri": { "type": "string" },
            "dispname": { "type": "string" }
        },
        "additionalProperties": false
    })
}

/// `project`, `version`, `count` scalars, integer-string keys holding flat
/// object dicts, and an optional `metadata` of any shape. No other
/// top-level keys are allowed.
pub fn inventory_schema() -> Value {
    json!({
        "type": "object",
        "required": ["project", "version", "count"],
        "properties": {
            "project": { "type": "string" },
            "version": { "type": "string" },
            "count": { "type": "integer", "minimum": 0 },
            "metadata": {}
        },
        "patternProperties": {
            "^[0-9]+$": object_entry_schema()
        },
        "additionalProperties": false
    })
}

fn validator() -> &'static Validator {
    static VALIDATOR: OnceLock<Validator> = OnceLock::new();
    VALIDATOR.get_or_init(|| {
        jsonschema::validator_for(&inventory_schema())
            .expect("inventory schema is a compile-time constant")
    })
}

/// Validate `value` against [`inventory_schema`], collecting every
/// violation into a single `ValidationError`.
pub fn validate(value: &Value) -> Result<(), InventoryError> {
    let v = validator();
    let errors: Vec<String> = v.iter_errors(value).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(InventoryError::ValidationError(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_valid_dict_passes() {
        let dict = json!({
            "project": "p",
            "version": "v",
            "count": 1,
            "0": {
                "name": "a", "domain": "py", "role": "class",
                "priority": "1", "uri": "a.html", "dispname": "-"
            }
        });
        assert!(validate(&dict).is_ok());
    }

    #[test]
    fn unknown_top_level_key_fails() {
        let dict = json!({
            "project": "p", "version": "v", "count": 0, "bad_foo": "angry_bar"
        });
        assert!(validate(&dict).is_err());
    }

    #[test]
    fn non_object_entry_fails() {
        let dict = json!({
            "project": "p", "version": "v", "count": 1, "0": "not an object"
        });
        assert!(validate(&dict).is_err());
    }

    #[test]
    fn metadata_of_any_shape_is_allowed() {
        for metadata in [json!("string"), json!({"a": 1}), json!(42), json!([1, 2])] {
            let dict = json!({
                "project": "p", "version": "v", "count": 0, "metadata": metadata
            });
            assert!(validate(&dict).is_ok());
        }
    }

    #[test]
    fn missing_required_scalar_fails() {
        let dict = json!({ "project": "p", "count": 0 });
        assert!(validate(&dict).is_err());
    }
}
