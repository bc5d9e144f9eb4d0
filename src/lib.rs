//! Contract Drift
//!
//! Cross-validates a Swagger/OpenAPI-style contract document against the
//! metadata of the implementation that serves it, rejecting drift between
//! the documented and the actual API surface at build time.
//!
//! ## Features
//!
//! - **Definitions**: every property is checked against its backing field;
//!   `$ref` targets must all be defined
//! - **Resources**: every documented operation must be implemented at the
//!   documented path, and tagged
//! - **Mime Types**: root, class and operation content types must agree
//! - **Pluggable Metadata**: implementation metadata comes from any
//!   [`MetadataProvider`]; [`TypeCatalog`] reads it from a manifest
//!
//! ## Usage
//!
//! ```no_run
//! use contract_drift::{ContractDocument, TypeCatalog, ValidationEngine};
//!
//! # fn main() -> contract_drift::Result<()> {
//! let document = ContractDocument::load("api/swagger.yaml")?;
//! let catalog = TypeCatalog::load("api/catalog.yaml")?;
//!
//! let mut engine = ValidationEngine::new(document, catalog);
//! engine.validate_all()?;
//!
//! for warning in engine.warnings() {
//!     println!("{}", warning);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod closure;
pub mod config;
pub mod definitions;
pub mod diagnostics;
pub mod document;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod reporter;
pub mod resources;

pub use catalog::{CatalogManifest, TypeCatalog, TypeEntry};
pub use closure::ReferenceClosure;
pub use config::ValidatorConfig;
pub use definitions::{DefinitionValidator, FieldTypeCheck, PropertyKind};
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Scope, Severity};
pub use document::ContractDocument;
pub use engine::{ValidationEngine, ValidationSummary};
pub use error::{ContractError, Result};
pub use metadata::{BackingType, HttpMethod, MetadataProvider, MimeDefaults, MimeKind, OperationMeta, TypeKind};
pub use reporter::MessageReporter;
pub use resources::{MimeConsistencyResolver, MimeLevel, MimeResolution, ResolvedMime, ResourceValidator};
