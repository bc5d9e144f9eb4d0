//! Field-type checks
//!
//! Run for `type` properties whose backing field is not text. Every check
//! whose [`applies`](FieldTypeCheck::applies) holds is run, in
//! [`FieldTypeCheck::ALL`] order.

use crate::config::ValidatorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::metadata::BackingType;

use super::PropertyContext;

const ARRAY: &str = "array";
const ITEMS: &str = "items";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTypeCheck {
    /// Sequence-backed properties must be declared `array` with `items`
    Array,
    /// Configured forbidden types
    Forbidden,
    /// Language primitives
    Primitive,
    /// Configured unrecommended types (warning)
    Unrecommended,
    /// Enumerations declared with `type`
    EnumAsType,
}

impl FieldTypeCheck {
    pub const ALL: [FieldTypeCheck; 5] = [
        Self::Array,
        Self::Forbidden,
        Self::Primitive,
        Self::Unrecommended,
        Self::EnumAsType,
    ];

    pub fn applies(&self, field: &BackingType, config: &ValidatorConfig) -> bool {
        match self {
            Self::Array => field.is_sequence(),
            Self::Forbidden => config.is_forbidden_type(&field.name),
            Self::Primitive => field.is_primitive(),
            Self::Unrecommended => config.is_unrecommended_type(&field.name),
            Self::EnumAsType => field.is_enumeration(),
        }
    }

    pub fn check(&self, ctx: &PropertyContext<'_>) -> Vec<Diagnostic> {
        match self {
            Self::Array => {
                let mut diagnostics = Vec::new();
                let declared = ctx.declared_type();
                if declared != ARRAY {
                    diagnostics.push(ctx.diagnostic(
                        DiagnosticCode::ArrayTypeMismatch,
                        format!("Is an array. Does not match {}", declared),
                    ));
                }
                if ctx.declaration.get(ITEMS).map_or(true, |items| items.is_null()) {
                    diagnostics.push(ctx.diagnostic(
                        DiagnosticCode::MissingItemsSchema,
                        format!("Items is required for '{}'", ARRAY),
                    ));
                }
                diagnostics
            }
            Self::Forbidden => vec![ctx.diagnostic(
                DiagnosticCode::ForbiddenType,
                format!("Type {} is forbidden to use. Use String instead.", ctx.field),
            )],
            Self::Primitive => vec![ctx.diagnostic(
                DiagnosticCode::PrimitiveTypeNotAllowed,
                "Is a primitive. Only objects must be used.",
            )],
            Self::Unrecommended => vec![ctx.diagnostic(
                DiagnosticCode::UnrecommendedType,
                format!("Unrecommended type: {}. Prefer using String.", ctx.field),
            )],
            Self::EnumAsType => vec![ctx.diagnostic(
                DiagnosticCode::EnumMustUseEnumKind,
                "Is enum. Declare it using 'enum' instead of type, or use String.",
            )],
        }
    }
}

/// Run every applicable check; warn when none applies
pub fn check_field_type(ctx: &PropertyContext<'_>) -> Vec<Diagnostic> {
    let mut applied = false;
    let mut diagnostics = Vec::new();

    for check in FieldTypeCheck::ALL {
        if check.applies(ctx.field, ctx.config) {
            applied = true;
            diagnostics.extend(check.check(ctx));
        }
    }

    if !applied {
        diagnostics.push(ctx.diagnostic(
            DiagnosticCode::UnvalidatedPropertyType,
            format!(
                "Unvalidated property of type {}. Should String be used, or does the checker need a rule for it?",
                ctx.field
            ),
        ));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TypeKind;
    use serde_json::json;

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    fn run(declaration: serde_json::Value, field: BackingType) -> Vec<Diagnostic> {
        let config = ValidatorConfig::default();
        let ctx = PropertyContext {
            definition: "Widget",
            property: "value",
            declaration: &declaration,
            field: &field,
            config: &config,
        };
        check_field_type(&ctx)
    }

    #[test]
    fn test_array_declared_with_items_passes() {
        let field = BackingType::new("java.util.List", TypeKind::Sequence);
        let diagnostics = run(json!({"type": "array", "items": {"type": "string"}}), field);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_array_mismatch_and_missing_items() {
        let field = BackingType::new("java.util.List", TypeKind::Sequence);
        let diagnostics = run(json!({"type": "object"}), field);
        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::ArrayTypeMismatch, DiagnosticCode::MissingItemsSchema]
        );
        assert_eq!(diagnostics[0].message, "Is an array. Does not match object");
    }

    #[test]
    fn test_forbidden_reported_before_unrecommended() {
        let mut config = ValidatorConfig::default();
        config.definitions.unrecommended_types.push("java.util.Date".to_string());

        let declaration = json!({"type": "string"});
        let field = BackingType::new("java.util.Date", TypeKind::Object);
        let ctx = PropertyContext {
            definition: "Widget",
            property: "created",
            declaration: &declaration,
            field: &field,
            config: &config,
        };

        assert_eq!(
            codes(&check_field_type(&ctx)),
            vec![DiagnosticCode::ForbiddenType, DiagnosticCode::UnrecommendedType]
        );
    }

    #[test]
    fn test_primitive_and_wrapper() {
        let primitive = run(json!({"type": "integer"}), BackingType::new("int", TypeKind::Primitive));
        assert_eq!(codes(&primitive), vec![DiagnosticCode::PrimitiveTypeNotAllowed]);

        let wrapper = run(json!({"type": "integer"}), BackingType::new("java.lang.Long", TypeKind::Object));
        assert_eq!(codes(&wrapper), vec![DiagnosticCode::UnrecommendedType]);
        assert_eq!(wrapper[0].message, "Unrecommended type: java.lang.Long. Prefer using String.");
    }

    #[test]
    fn test_enumeration_declared_as_type() {
        let diagnostics = run(json!({"type": "string"}), BackingType::new("com.example.Color", TypeKind::Enumeration));
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::EnumMustUseEnumKind]);
    }

    #[test]
    fn test_unvalidated_object_warns() {
        let diagnostics = run(json!({"type": "object"}), BackingType::new("com.example.Part", TypeKind::Object));
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::UnvalidatedPropertyType]);
        assert!(!diagnostics[0].is_error());
    }
}
