//! Type Catalog
//!
//! A [`MetadataProvider`] backed by a manifest instead of live introspection.
//! Used by the `contract-check` binary and as the provider in tests.
//!
//! ## Example manifest (catalog.yaml):
//! ```yaml
//! types:
//!   com.example.Widget:
//!     kind: object
//!     fields:
//!       name: java.lang.String
//!       count: int
//!   com.example.WidgetResource:
//!     path: /widgets
//!     consumes: application/json
//!     produces: application/json
//!     operations:
//!       - method: get
//!       - method: get
//!         path: "/{id}"
//! ```
//!
//! Common JVM types (`java.lang.String`, primitives, wrappers, dates,
//! collections) are built in and do not need to be declared.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ContractError, Result};
use crate::metadata::{BackingType, MetadataProvider, MimeDefaults, OperationMeta, TypeKind};

const TEXT_TYPES: &[&str] = &["java.lang.String", "java.lang.CharSequence"];

const PRIMITIVE_TYPES: &[&str] = &["boolean", "byte", "char", "short", "int", "long", "float", "double"];

const OBJECT_TYPES: &[&str] = &[
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.lang.Object",
    "java.math.BigDecimal",
    "java.math.BigInteger",
    "java.util.Date",
    "java.util.Calendar",
    "java.util.Map",
];

const SEQUENCE_TYPES: &[&str] = &[
    "java.util.List",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.Set",
    "java.util.Collection",
];

/// Package searched when a bare simple name (e.g. "String") is looked up
const IMPLICIT_PACKAGE: &str = "java.lang.";

/// One declared type in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntry {
    #[serde(default = "default_kind")]
    pub kind: TypeKind,

    /// Field name -> type identifier
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Base path (resource types only)
    #[serde(default)]
    pub path: Option<String>,

    /// Class-level mime defaults
    #[serde(default)]
    pub consumes: Option<String>,
    #[serde(default)]
    pub produces: Option<String>,

    #[serde(default)]
    pub operations: Vec<OperationMeta>,
}

fn default_kind() -> TypeKind {
    TypeKind::Object
}

impl TypeEntry {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
            path: None,
            consumes: None,
            produces: None,
            operations: Vec::new(),
        }
    }

    /// An object type with no fields yet
    pub fn object() -> Self {
        Self::new(TypeKind::Object)
    }

    /// A resource type rooted at `path`
    pub fn resource(path: impl Into<String>) -> Self {
        let mut entry = Self::object();
        entry.path = Some(path.into());
        entry
    }

    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), type_name.into());
        self
    }

    pub fn operation(mut self, operation: OperationMeta) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn consumes(mut self, mime: impl Into<String>) -> Self {
        self.consumes = Some(mime.into());
        self
    }

    pub fn produces(mut self, mime: impl Into<String>) -> Self {
        self.produces = Some(mime.into());
        self
    }
}

/// On-disk manifest layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub types: BTreeMap<String, TypeEntry>,
}

/// Data-driven implementation metadata
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    types: BTreeMap<String, TypeEntry>,
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCatalog {
    /// Catalog seeded with the built-in JVM types
    pub fn new() -> Self {
        let mut types = BTreeMap::new();

        for (names, kind) in [
            (TEXT_TYPES, TypeKind::Text),
            (PRIMITIVE_TYPES, TypeKind::Primitive),
            (OBJECT_TYPES, TypeKind::Object),
            (SEQUENCE_TYPES, TypeKind::Sequence),
        ] {
            for name in names {
                types.insert(name.to_string(), TypeEntry::new(kind));
            }
        }

        Self { types }
    }

    /// Catalog from a parsed manifest (built-ins are kept unless overridden)
    pub fn from_manifest(manifest: CatalogManifest) -> Self {
        let mut catalog = Self::new();
        catalog.types.extend(manifest.types);
        catalog
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let manifest: CatalogManifest = serde_yaml::from_str(content)?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let manifest: CatalogManifest = serde_json::from_str(content)?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: CatalogManifest = toml::from_str(content)?;
        Ok(Self::from_manifest(manifest))
    }

    /// Load a manifest, choosing the format from the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(ContractError::InvalidCatalog(format!(
                "unsupported catalog format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Add or replace a type
    pub fn insert(&mut self, name: impl Into<String>, entry: TypeEntry) {
        self.types.insert(name.into(), entry);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_type(mut self, name: impl Into<String>, entry: TypeEntry) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Look up an entry by exact name, falling back to the implicit package
    fn lookup(&self, identifier: &str) -> Option<(String, &TypeEntry)> {
        if let Some(entry) = self.types.get(identifier) {
            return Some((identifier.to_string(), entry));
        }
        if !identifier.contains('.') {
            let qualified = format!("{}{}", IMPLICIT_PACKAGE, identifier);
            if let Some(entry) = self.types.get(&qualified) {
                return Some((qualified, entry));
            }
        }
        None
    }
}

impl MetadataProvider for TypeCatalog {
    fn resolve_type(&self, identifier: &str) -> Result<BackingType> {
        if let Some((name, entry)) = self.lookup(identifier) {
            return Ok(BackingType::new(name, entry.kind));
        }
        if identifier.ends_with("[]") {
            return Ok(BackingType::new(identifier, TypeKind::Sequence));
        }
        Err(ContractError::TypeNotFound(identifier.to_string()))
    }

    fn field_type(&self, owner: &BackingType, property: &str) -> Option<BackingType> {
        let type_name = self.types.get(&owner.name)?.fields.get(property)?;
        // Field types outside the catalog are still valid object types
        Some(
            self.resolve_type(type_name)
                .unwrap_or_else(|_| BackingType::new(type_name.clone(), TypeKind::Object)),
        )
    }

    fn declared_operations(&self, owner: &BackingType) -> Vec<OperationMeta> {
        self.types
            .get(&owner.name)
            .map(|entry| entry.operations.clone())
            .unwrap_or_default()
    }

    fn class_default_mimes(&self, owner: &BackingType) -> MimeDefaults {
        self.types
            .get(&owner.name)
            .map(|entry| MimeDefaults {
                consumes: entry.consumes.clone(),
                produces: entry.produces.clone(),
            })
            .unwrap_or_default()
    }

    fn base_path(&self, owner: &BackingType) -> Option<String> {
        self.types.get(&owner.name)?.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::HttpMethod;

    const MANIFEST: &str = r#"
types:
  com.example.Widget:
    fields:
      name: java.lang.String
      count: int
      parts: com.example.Part[]
      owner: com.example.Unknown
  com.example.Color:
    kind: enumeration
  com.example.WidgetResource:
    path: /widgets
    produces: application/json
    operations:
      - method: GET
      - method: post
        consumes: application/xml
      - method: get
        path: "/{id}"
"#;

    #[test]
    fn test_builtins_resolve() {
        let catalog = TypeCatalog::new();
        assert_eq!(catalog.resolve_type("int").unwrap().kind, TypeKind::Primitive);
        assert_eq!(catalog.resolve_type("java.util.List").unwrap().kind, TypeKind::Sequence);

        let string = catalog.resolve_type("String").unwrap();
        assert_eq!(string.name, "java.lang.String");
        assert!(string.is_text());
    }

    #[test]
    fn test_unknown_type_is_not_found() {
        let catalog = TypeCatalog::new();
        let err = catalog.resolve_type("com.example.Missing").unwrap_err();
        assert!(matches!(err, ContractError::TypeNotFound(name) if name == "com.example.Missing"));
    }

    #[test]
    fn test_yaml_manifest_fields() {
        let catalog = TypeCatalog::from_yaml_str(MANIFEST).unwrap();
        let widget = catalog.resolve_type("com.example.Widget").unwrap();

        assert_eq!(catalog.field_type(&widget, "count").unwrap().kind, TypeKind::Primitive);
        assert_eq!(catalog.field_type(&widget, "parts").unwrap().kind, TypeKind::Sequence);
        assert_eq!(catalog.field_type(&widget, "owner").unwrap().kind, TypeKind::Object);
        assert!(catalog.field_type(&widget, "missing").is_none());
        assert!(catalog.resolve_type("com.example.Color").unwrap().is_enumeration());
    }

    #[test]
    fn test_yaml_manifest_resources() {
        let catalog = TypeCatalog::from_yaml_str(MANIFEST).unwrap();
        let resource = catalog.resolve_type("com.example.WidgetResource").unwrap();

        assert_eq!(catalog.base_path(&resource).as_deref(), Some("/widgets"));
        assert_eq!(catalog.class_default_mimes(&resource).produces.as_deref(), Some("application/json"));

        let ops = catalog.declared_operations(&resource);
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].method, Some(HttpMethod::Get));
        assert_eq!(ops[1].consumes.as_deref(), Some("application/xml"));
        assert_eq!(ops[2].sub_path.as_deref(), Some("/{id}"));
    }

    #[test]
    fn test_toml_manifest() {
        let catalog = TypeCatalog::from_toml_str(
            r#"
[types."com.example.Thing"]
kind = "object"
fields = { label = "java.lang.String" }
"#,
        )
        .unwrap();
        let thing = catalog.resolve_type("com.example.Thing").unwrap();
        assert!(catalog.field_type(&thing, "label").unwrap().is_text());
    }

    #[test]
    fn test_builder_api() {
        let builtins = TypeCatalog::new().type_count();
        let catalog = TypeCatalog::new().with_type(
            "com.example.R",
            TypeEntry::resource("/r").operation(OperationMeta::new(HttpMethod::Put)),
        );
        let r = catalog.resolve_type("com.example.R").unwrap();
        assert_eq!(catalog.declared_operations(&r)[0].method, Some(HttpMethod::Put));
        assert_eq!(catalog.type_count(), builtins + 1);
    }
}
