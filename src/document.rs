//! Contract document loading
//!
//! The contract is held as an order-preserving `serde_json` value tree so
//! `definitions` and `paths` are walked in the order they were written.
//! YAML input is converted into the same tree.

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{ContractError, Result};
use crate::metadata::{MimeDefaults, MimeKind};

pub const DEFINITIONS: &str = "definitions";
pub const PATHS: &str = "paths";

/// A loaded contract document (immutable once built)
#[derive(Debug, Clone)]
pub struct ContractDocument {
    root: Map<String, Value>,
}

impl ContractDocument {
    /// Wrap an already-parsed value; the root must be a mapping
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ContractError::InvalidDocument(format!(
                "root must be a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        let value = yaml_to_json_value(&yaml).map_err(ContractError::InvalidDocument)?;
        Self::from_value(value)
    }

    /// Load from disk; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Top-level entry by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// The `definitions` section, if present and a mapping
    pub fn definitions(&self) -> Option<&Map<String, Value>> {
        self.get(DEFINITIONS).and_then(Value::as_object)
    }

    /// The `paths` section, if present and a mapping
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.get(PATHS).and_then(Value::as_object)
    }

    /// First entry of the root-level `consumes`/`produces` lists
    pub fn root_mimes(&self) -> MimeDefaults {
        MimeDefaults {
            consumes: self.root_mime(MimeKind::Consumes),
            produces: self.root_mime(MimeKind::Produces),
        }
    }

    fn root_mime(&self, kind: MimeKind) -> Option<String> {
        self.get(kind.key()).and_then(first_string)
    }
}

/// First string of a sequence, or the value itself when it is a plain string
pub fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// The backing-type tag of a definition or resource declaration
pub fn type_tag<'a>(declaration: &'a Value, tag: &str) -> Option<&'a str> {
    declaration.get(tag).and_then(Value::as_str)
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Convert a `serde_yaml::Value` into the equivalent JSON tree.
///
/// Scalar keys are stringified; tags are dropped.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> std::result::Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: std::result::Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_preserves_document_order() {
        let doc = ContractDocument::from_yaml_str(
            r#"
definitions:
  Zebra: {}
  Apple: {}
  Mango: {}
paths: {}
"#,
        )
        .unwrap();

        let names: Vec<&String> = doc.definitions().unwrap().keys().collect();
        assert_eq!(names, ["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn test_yaml_numeric_keys_are_stringified() {
        let doc = ContractDocument::from_yaml_str("responses:\n  200: ok\n").unwrap();
        assert_eq!(doc.get("responses").unwrap()["200"], json!("ok"));
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = ContractDocument::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ContractError::InvalidDocument(_)));
    }

    #[test]
    fn test_root_mimes_take_first_entry() {
        let doc = ContractDocument::from_value(json!({
            "produces": ["application/json", "application/xml"],
            "consumes": "text/plain",
        }))
        .unwrap();

        let mimes = doc.root_mimes();
        assert_eq!(mimes.produces.as_deref(), Some("application/json"));
        assert_eq!(mimes.consumes.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_missing_sections() {
        let doc = ContractDocument::from_value(json!({ "paths": [] })).unwrap();
        assert!(doc.definitions().is_none());
        assert!(doc.paths().is_none());
        assert_eq!(doc.root_mimes(), MimeDefaults::default());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("api.yaml");
        std::fs::write(&yaml, "definitions: {}\npaths: {}\n").unwrap();
        assert!(ContractDocument::load(&yaml).unwrap().definitions().is_some());

        let json = dir.path().join("api.json");
        std::fs::write(&json, r#"{"definitions": {}, "paths": {}}"#).unwrap();
        assert!(ContractDocument::load(&json).unwrap().paths().is_some());
    }
}
