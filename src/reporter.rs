//! Message reporting
//!
//! Every diagnostic produced by a validator passes through the
//! [`MessageReporter`]. Warnings are logged and recorded; errors are logged,
//! recorded, and turned into the [`ContractError`] that aborts the pass.

use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Scope, Severity};
use crate::error::{ContractError, Result};

/// Run-scoped sink for diagnostics
#[derive(Debug, Default)]
pub struct MessageReporter {
    diagnostics: Diagnostics,
}

impl MessageReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-fatal diagnostic and return its rendered text
    pub fn warn(&mut self, diagnostic: Diagnostic) -> String {
        let formatted = diagnostic.to_string();
        tracing::warn!(code = %diagnostic.code, scope = %diagnostic.scope, "{}", formatted);
        self.diagnostics.push(diagnostic);
        formatted
    }

    /// Record a fatal diagnostic and return the failure to propagate
    pub fn error(&mut self, diagnostic: Diagnostic) -> ContractError {
        tracing::error!(code = %diagnostic.code, scope = %diagnostic.scope, "{}", diagnostic);
        self.diagnostics.push(diagnostic.clone());
        ContractError::validation(diagnostic)
    }

    /// Route a diagnostic by the severity of its code
    pub fn report(&mut self, diagnostic: Diagnostic) -> Result<()> {
        match diagnostic.severity() {
            Severity::Warning => {
                self.warn(diagnostic);
                Ok(())
            }
            Severity::Error => Err(self.error(diagnostic)),
        }
    }

    /// Report a batch in order, stopping at the first error
    pub fn report_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> Result<()> {
        for diagnostic in diagnostics {
            self.report(diagnostic)?;
        }
        Ok(())
    }

    /// Shorthand for an error built in place
    pub fn fail(&mut self, scope: Scope, code: DiagnosticCode, message: impl Into<String>) -> ContractError {
        self.error(Diagnostic::new(scope, code, message))
    }

    /// Everything recorded so far
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded_and_formatted() {
        let mut reporter = MessageReporter::new();
        let text = reporter.warn(Diagnostic::new(
            Scope::path("/widgets"),
            DiagnosticCode::ForbiddenOperationDeclared,
            "Operation head should not be defined. It's provided by the container.",
        ));
        assert!(text.starts_with("Path: /widgets: Operation head"));
        assert_eq!(reporter.diagnostics().warning_count(), 1);
    }

    #[test]
    fn test_report_stops_at_first_error() {
        let mut reporter = MessageReporter::new();
        let batch = vec![
            Diagnostic::new(Scope::definition("A"), DiagnosticCode::UnrecommendedType, "w"),
            Diagnostic::new(Scope::definition("A"), DiagnosticCode::ForbiddenType, "e"),
            Diagnostic::new(Scope::definition("A"), DiagnosticCode::UnrecommendedType, "never"),
        ];
        let err = reporter.report_all(batch).unwrap_err();
        assert_eq!(err.code(), Some(DiagnosticCode::ForbiddenType));
        assert_eq!(reporter.diagnostics().len(), 2);
    }
}
