//! Property-kind dispatch
//!
//! A property declares exactly one of `$ref`, `enum` or `type`. The enabled
//! kinds (and their precedence) come from configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::closure::definition_name;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

use super::field_type::check_field_type;
use super::PropertyContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Ref,
    Enum,
    Type,
}

/// What checking one property produced
#[derive(Debug, Default)]
pub struct PropertyOutcome {
    pub diagnostics: Vec<Diagnostic>,
    /// Definition named by a `$ref`, for the reference closure
    pub reference: Option<String>,
}

impl PropertyOutcome {
    fn diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            reference: None,
        }
    }
}

impl PropertyKind {
    /// Discriminator key in a property declaration
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ref => "$ref",
            Self::Enum => "enum",
            Self::Type => "type",
        }
    }

    /// True when the declaration carries this kind's key with a non-null value
    pub fn declared_in(&self, declaration: &Value) -> bool {
        declaration.get(self.key()).map_or(false, |v| !v.is_null())
    }

    /// The single enabled kind a declaration selects, or `None` when it
    /// declares none or several of them
    pub fn select(declaration: &Value, enabled: &[PropertyKind]) -> Option<PropertyKind> {
        let mut present = enabled.iter().filter(|kind| kind.declared_in(declaration));
        match (present.next(), present.next()) {
            (Some(kind), None) => Some(*kind),
            _ => None,
        }
    }

    pub fn check(&self, ctx: &PropertyContext<'_>) -> PropertyOutcome {
        match self {
            Self::Ref => check_ref(ctx),
            Self::Enum => PropertyOutcome::diagnostics(check_enum(ctx)),
            Self::Type => {
                if ctx.field.is_text() {
                    return PropertyOutcome::default();
                }
                PropertyOutcome::diagnostics(check_field_type(ctx))
            }
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// `$ref` is resolved lazily through the closure; no type check here
fn check_ref(ctx: &PropertyContext<'_>) -> PropertyOutcome {
    match ctx.declaration.get(PropertyKind::Ref.key()).and_then(Value::as_str) {
        Some(reference) => PropertyOutcome {
            diagnostics: Vec::new(),
            reference: Some(definition_name(reference).to_string()),
        },
        None => PropertyOutcome::diagnostics(vec![ctx.diagnostic(
            DiagnosticCode::AmbiguousPropertyKind,
            "$ref must name a definition.",
        )]),
    }
}

fn check_enum(ctx: &PropertyContext<'_>) -> Vec<Diagnostic> {
    let empty = match ctx.declaration.get(PropertyKind::Enum.key()) {
        Some(Value::Array(values)) => values.is_empty(),
        _ => true,
    };
    if empty {
        return vec![ctx.diagnostic(DiagnosticCode::EmptyEnum, "Enum is empty!")];
    }

    if ctx.field.is_text() {
        return Vec::new();
    }

    let mut diagnostics = vec![ctx.diagnostic(
        DiagnosticCode::EnumNotString,
        "It's recommended to use String with enums!",
    )];

    // Enumeration backing is accepted without comparing value sets
    if !ctx.field.is_enumeration() {
        diagnostics.push(ctx.diagnostic(DiagnosticCode::InvalidEnumBacking, "Must be either Enum or String"));
    }

    diagnostics
}
