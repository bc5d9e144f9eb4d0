//! Diagnostics
//!
//! Structured records for everything the validators report. A diagnostic is
//! {code, scope, message, context}; text is only produced at the reporting
//! boundary through `Display`.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // === Backing types ===
    /// Definition or resource has no backing-type tag
    MissingTypeTag,
    /// Backing-type tag does not resolve to an implementation type
    TypeResolutionError,
    /// Contract property has no field on the backing type
    PropertyNotFound,

    // === Property kinds ===
    /// Property declares none, or more than one, of $ref/type/enum
    AmbiguousPropertyKind,
    /// enum declared without values
    EmptyEnum,
    /// enum backed by a type that is neither text nor an enumeration
    InvalidEnumBacking,
    /// enum backed by an enumeration type instead of text
    EnumNotString,

    // === Field types ===
    /// Sequence-backed property not declared as `array`
    ArrayTypeMismatch,
    /// `array` property without an `items` schema
    MissingItemsSchema,
    /// Backing type is in the forbidden set
    ForbiddenType,
    /// Backing type is a language primitive
    PrimitiveTypeNotAllowed,
    /// Backing type is in the unrecommended set
    UnrecommendedType,
    /// Enumeration-backed property declared with `type`
    EnumMustUseEnumKind,
    /// No field-type check applied to a non-text backing type
    UnvalidatedPropertyType,

    // === Reference closure ===
    /// $ref names a definition that is never declared
    UndefinedReference,

    // === Paths and operations ===
    /// Resource type declares no base path
    PathAnnotationMissing,
    /// Contract path is not under the resource base path
    PathMismatch,
    /// No operation declares the remaining sub-path
    NoMatchingSubPath,
    /// Contract operation has no implementing operation
    OperationNotImplemented,
    /// Implemented operation declared without tags
    MissingTags,
    /// Container-provided operation declared in the contract
    ForbiddenOperationDeclared,

    // === Mime types ===
    /// Root default mime disagrees with the class default
    RootMimeMismatch,
    /// Documented mime disagrees with the operation override
    OperationMimeMismatch,
    /// Documented mime disagrees with the class default
    ClassMimeMismatch,
    /// Operation has no consumes/produces anywhere in the override chain
    MimeAnnotationMissing,

    // === Document ===
    /// Required top-level section is absent
    MissingSection,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingTypeTag => "E001",
            Self::TypeResolutionError => "E002",
            Self::PropertyNotFound => "E003",
            Self::AmbiguousPropertyKind => "E004",
            Self::EmptyEnum => "E005",
            Self::InvalidEnumBacking => "E006",
            Self::ArrayTypeMismatch => "E007",
            Self::MissingItemsSchema => "E008",
            Self::ForbiddenType => "E009",
            Self::PrimitiveTypeNotAllowed => "E010",
            Self::EnumMustUseEnumKind => "E011",
            Self::UndefinedReference => "E012",
            Self::PathAnnotationMissing => "E013",
            Self::PathMismatch => "E014",
            Self::NoMatchingSubPath => "E015",
            Self::OperationNotImplemented => "E016",
            Self::MissingTags => "E017",
            Self::RootMimeMismatch => "E018",
            Self::OperationMimeMismatch => "E019",
            Self::ClassMimeMismatch => "E020",
            Self::MimeAnnotationMissing => "E021",
            Self::MissingSection => "E022",
            Self::UnvalidatedPropertyType => "W001",
            Self::ForbiddenOperationDeclared => "W002",
            Self::EnumNotString => "W003",
            Self::UnrecommendedType => "W004",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::UnvalidatedPropertyType
            | Self::ForbiddenOperationDeclared
            | Self::EnumNotString
            | Self::UnrecommendedType => Severity::Warning,

            Self::MissingTypeTag
            | Self::TypeResolutionError
            | Self::PropertyNotFound
            | Self::AmbiguousPropertyKind
            | Self::EmptyEnum
            | Self::InvalidEnumBacking
            | Self::ArrayTypeMismatch
            | Self::MissingItemsSchema
            | Self::ForbiddenType
            | Self::PrimitiveTypeNotAllowed
            | Self::EnumMustUseEnumKind
            | Self::UndefinedReference
            | Self::PathAnnotationMissing
            | Self::PathMismatch
            | Self::NoMatchingSubPath
            | Self::OperationNotImplemented
            | Self::MissingTags
            | Self::RootMimeMismatch
            | Self::OperationMimeMismatch
            | Self::ClassMimeMismatch
            | Self::MimeAnnotationMissing
            | Self::MissingSection => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Scope
// =============================================================================

/// The logical location a diagnostic is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// The contract document as a whole
    Document,
    /// A named entry under `definitions`
    Definition { name: String },
    /// One property of a definition
    Property { definition: String, property: String },
    /// An entry under `paths`
    Path { path: String },
}

impl Scope {
    pub fn definition(name: impl Into<String>) -> Self {
        Self::Definition { name: name.into() }
    }

    pub fn property(definition: impl Into<String>, property: impl Into<String>) -> Self {
        Self::Property {
            definition: definition.into(),
            property: property.into(),
        }
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self::Path { path: path.into() }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "Contract"),
            Self::Definition { name } => write!(f, "Definition: {}", name),
            Self::Property { definition, property } => {
                write!(f, "Definition: {}: Property {}", definition, property)
            }
            Self::Path { path } => write!(f, "Path: {}", path),
        }
    }
}

// =============================================================================
// Diagnostic
// =============================================================================

/// A single diagnostic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Where the issue was found
    pub scope: Scope,
    /// Diagnostic code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Additional context (e.g., referrers, exposed verbs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl Diagnostic {
    pub fn new(scope: Scope, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            scope,
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.message)?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics emitted during a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn push(&mut self, item: Diagnostic) {
        self.items.push(item);
    }

    /// Get all errors
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|i| i.severity() == Severity::Error)
    }

    /// Get all warnings
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    /// Items carrying a specific code
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |i| i.code == code)
    }

    /// Get all items
    pub fn all(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_severity() {
        assert_eq!(DiagnosticCode::AmbiguousPropertyKind.severity(), Severity::Error);
        assert_eq!(DiagnosticCode::ForbiddenOperationDeclared.severity(), Severity::Warning);
        assert_eq!(DiagnosticCode::UnrecommendedType.as_str(), "W004");
    }

    #[test]
    fn test_scope_rendering() {
        let d = Diagnostic::new(
            Scope::property("Widget", "count"),
            DiagnosticCode::PrimitiveTypeNotAllowed,
            "Is a primitive. Only objects must be used.",
        );
        assert_eq!(
            d.to_string(),
            "Definition: Widget: Property count: Is a primitive. Only objects must be used."
        );

        let d = Diagnostic::new(
            Scope::path("/widgets"),
            DiagnosticCode::MissingTags,
            "Tags must be defined for operation: get",
        )
            .with_context("declared in contract");
        assert_eq!(
            d.to_string(),
            "Path: /widgets: Tags must be defined for operation: get\n  - declared in contract"
        );
    }

    #[test]
    fn test_diagnostics_collection() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(Scope::definition("A"), DiagnosticCode::UndefinedReference, "missing"));
        diags.push(Diagnostic::new(Scope::path("/a"), DiagnosticCode::ForbiddenOperationDeclared, "head"));

        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.with_code(DiagnosticCode::ForbiddenOperationDeclared).count(), 1);
        assert_eq!(diags.all()[0].code, DiagnosticCode::UndefinedReference);
    }
}
