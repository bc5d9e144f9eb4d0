//! Implementation metadata
//!
//! The validators never inspect an implementation directly. Everything they
//! know about backing types, fields, operations and mime declarations comes
//! through [`MetadataProvider`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Structural category of a backing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Language primitive (not an object wrapper)
    Primitive,
    /// String-like; convertible from anything at the application layer
    Text,
    /// Enumeration type
    Enumeration,
    /// Array or list type
    Sequence,
    /// Any other object type
    Object,
}

/// A type on the implementation side, as resolved by a provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackingType {
    /// Fully qualified identifier (e.g., "java.lang.Long")
    pub name: String,
    pub kind: TypeKind,
}

impl BackingType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TypeKind::Text
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == TypeKind::Primitive
    }

    pub fn is_enumeration(&self) -> bool {
        self.kind == TypeKind::Enumeration
    }

    pub fn is_sequence(&self) -> bool {
        self.kind == TypeKind::Sequence
    }
}

impl fmt::Display for BackingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// HTTP verbs an operation can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[serde(alias = "GET")]
    Get,
    #[serde(alias = "POST")]
    Post,
    #[serde(alias = "PUT")]
    Put,
    #[serde(alias = "DELETE")]
    Delete,
    #[serde(alias = "PATCH")]
    Patch,
    #[serde(alias = "HEAD")]
    Head,
    #[serde(alias = "OPTIONS")]
    Options,
}

impl HttpMethod {
    /// Parse a contract operation key, ignoring case
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
            Self::Head => "head",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

/// Which side of the content negotiation a mime declaration covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MimeKind {
    Consumes,
    Produces,
}

impl MimeKind {
    /// Key used in the contract document
    pub fn key(&self) -> &'static str {
        match self {
            Self::Consumes => "consumes",
            Self::Produces => "produces",
        }
    }
}

impl fmt::Display for MimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Class-level (resource-level) default mime declarations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeDefaults {
    #[serde(default)]
    pub consumes: Option<String>,
    #[serde(default)]
    pub produces: Option<String>,
}

impl MimeDefaults {
    pub fn get(&self, kind: MimeKind) -> Option<&str> {
        match kind {
            MimeKind::Consumes => self.consumes.as_deref(),
            MimeKind::Produces => self.produces.as_deref(),
        }
    }
}

/// One operation exposed by a resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationMeta {
    /// Bound HTTP verb; `None` for path-only members (sub-resource locators)
    #[serde(default)]
    pub method: Option<HttpMethod>,
    /// Path fragment relative to the resource base path
    #[serde(default, rename = "path")]
    pub sub_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Operation-level overrides
    #[serde(default)]
    pub consumes: Option<String>,
    #[serde(default)]
    pub produces: Option<String>,
}

impl OperationMeta {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method: Some(method),
            ..Default::default()
        }
    }

    pub fn with_sub_path(mut self, sub_path: impl Into<String>) -> Self {
        self.sub_path = Some(sub_path.into());
        self
    }

    pub fn with_consumes(mut self, mime: impl Into<String>) -> Self {
        self.consumes = Some(mime.into());
        self
    }

    pub fn with_produces(mut self, mime: impl Into<String>) -> Self {
        self.produces = Some(mime.into());
        self
    }

    /// Operation-level override for one mime kind
    pub fn mime(&self, kind: MimeKind) -> Option<&str> {
        match kind {
            MimeKind::Consumes => self.consumes.as_deref(),
            MimeKind::Produces => self.produces.as_deref(),
        }
    }

    /// Exact match against the sub-path left after stripping the base path.
    /// An empty remainder only matches an operation without a fragment.
    pub fn serves_sub_path(&self, remaining: &str) -> bool {
        self.sub_path.as_deref().unwrap_or("") == remaining
    }

    /// True when bound to `method` at `remaining`
    pub fn implements(&self, method: HttpMethod, remaining: &str) -> bool {
        self.method == Some(method) && self.serves_sub_path(remaining)
    }
}

/// Capability interface over the implementation being checked
pub trait MetadataProvider {
    /// Resolve a contract-supplied type identifier.
    ///
    /// Fails with [`ContractError::TypeNotFound`](crate::ContractError::TypeNotFound)
    /// when the identifier is unknown.
    fn resolve_type(&self, identifier: &str) -> Result<BackingType>;

    /// Declared type of a named field, or `None` if the type has no such field
    fn field_type(&self, owner: &BackingType, property: &str) -> Option<BackingType>;

    /// Operations exposed by the type's members, in declaration order
    fn declared_operations(&self, owner: &BackingType) -> Vec<OperationMeta>;

    /// Class-level mime defaults
    fn class_default_mimes(&self, owner: &BackingType) -> MimeDefaults;

    /// Base path template, if the type declares one
    fn base_path(&self, owner: &BackingType) -> Option<String>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn resolve_type(&self, identifier: &str) -> Result<BackingType> {
        (**self).resolve_type(identifier)
    }

    fn field_type(&self, owner: &BackingType, property: &str) -> Option<BackingType> {
        (**self).field_type(owner, property)
    }

    fn declared_operations(&self, owner: &BackingType) -> Vec<OperationMeta> {
        (**self).declared_operations(owner)
    }

    fn class_default_mimes(&self, owner: &BackingType) -> MimeDefaults {
        (**self).class_default_mimes(owner)
    }

    fn base_path(&self, owner: &BackingType) -> Option<String> {
        (**self).base_path(owner)
    }
}
