//! Definitions validation
//!
//! Checks one entry of the contract's `definitions` section against its
//! backing type:
//!
//! 1. the backing-type tag must be present and resolve;
//! 2. every property must exist as a field on the backing type;
//! 3. every property must declare exactly one enabled kind, which is then
//!    checked by [`PropertyKind::check`].
//!
//! `$ref` targets are registered into the [`ReferenceClosure`] instead of
//! being resolved on the spot.

mod field_type;
mod property;

pub use field_type::{check_field_type, FieldTypeCheck};
pub use property::{PropertyKind, PropertyOutcome};

use serde_json::Value;

use crate::closure::ReferenceClosure;
use crate::config::ValidatorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Scope};
use crate::document::type_tag;
use crate::error::{ContractError, Result};
use crate::metadata::{BackingType, MetadataProvider};
use crate::reporter::MessageReporter;

const PROPERTIES: &str = "properties";

/// Everything a property check needs to know about one property
#[derive(Debug, Clone, Copy)]
pub struct PropertyContext<'a> {
    pub definition: &'a str,
    pub property: &'a str,
    /// Raw declaration mapping
    pub declaration: &'a Value,
    /// Resolved backing field type
    pub field: &'a BackingType,
    pub config: &'a ValidatorConfig,
}

impl<'a> PropertyContext<'a> {
    pub fn scope(&self) -> Scope {
        Scope::property(self.definition, self.property)
    }

    pub fn diagnostic(&self, code: DiagnosticCode, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(self.scope(), code, message)
    }

    /// The `type` value as written (non-strings rendered as JSON)
    pub fn declared_type(&self) -> String {
        match self.declaration.get(PropertyKind::Type.key()) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

/// Resolve the backing type named by a declaration's type tag
pub(crate) fn resolve_backing_type<P: MetadataProvider>(
    provider: &P,
    config: &ValidatorConfig,
    scope: Scope,
    declaration: &Value,
    reporter: &mut MessageReporter,
) -> Result<BackingType> {
    let tag = config.type_tag();
    let Some(identifier) = type_tag(declaration, tag) else {
        return Err(reporter.fail(scope, DiagnosticCode::MissingTypeTag, format!("{} is not defined.", tag)));
    };

    match provider.resolve_type(identifier) {
        Ok(backing) => Ok(backing),
        Err(ContractError::TypeNotFound(name)) => Err(reporter.fail(
            scope,
            DiagnosticCode::TypeResolutionError,
            format!("Class not found {}", name),
        )),
        Err(e) => Err(e),
    }
}

/// Validates entries of `definitions`
pub struct DefinitionValidator<'a, P> {
    provider: &'a P,
    config: &'a ValidatorConfig,
}

impl<'a, P: MetadataProvider> DefinitionValidator<'a, P> {
    pub fn new(provider: &'a P, config: &'a ValidatorConfig) -> Self {
        Self { provider, config }
    }

    /// Validate one definition, stopping at its first error
    pub fn validate(
        &self,
        name: &str,
        declaration: &Value,
        closure: &mut ReferenceClosure,
        reporter: &mut MessageReporter,
    ) -> Result<()> {
        let scope = Scope::definition(name);
        let backing = resolve_backing_type(self.provider, self.config, scope.clone(), declaration, reporter)?;
        tracing::debug!(definition = name, backing = %backing, "validating definition");

        closure.mark_checked(name);

        let Some(properties) = declaration.get(PROPERTIES).and_then(Value::as_object) else {
            return Ok(());
        };

        for (property, property_decl) in properties {
            let Some(field) = self.provider.field_type(&backing, property) else {
                return Err(reporter.fail(
                    scope.clone(),
                    DiagnosticCode::PropertyNotFound,
                    format!("Property {} does not exist.", property),
                ));
            };

            let Some(kind) = PropertyKind::select(property_decl, &self.config.definitions.property_kinds) else {
                return Err(reporter.fail(
                    scope.clone(),
                    DiagnosticCode::AmbiguousPropertyKind,
                    format!(
                        "Property {} is not defined well. Define either {}.",
                        property,
                        self.kind_choices()
                    ),
                ));
            };

            let ctx = PropertyContext {
                definition: name,
                property,
                declaration: property_decl,
                field: &field,
                config: self.config,
            };
            let outcome = kind.check(&ctx);
            reporter.report_all(outcome.diagnostics)?;

            if let Some(reference) = outcome.reference {
                closure.register_reference(name, &reference);
            }
        }

        Ok(())
    }

    /// "$ref, or type, or enum" style listing of the enabled kinds
    fn kind_choices(&self) -> String {
        self.config
            .definitions
            .property_kinds
            .iter()
            .map(PropertyKind::key)
            .collect::<Vec<_>>()
            .join(", or ")
    }
}
