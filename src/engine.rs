//! Validation engine
//!
//! Drives the two independent passes over a contract document:
//!
//! - [`validate_definitions`](ValidationEngine::validate_definitions) walks
//!   `definitions` in document order, then requires every `$ref` target to
//!   have been validated;
//! - [`validate_resources`](ValidationEngine::validate_resources) walks
//!   `paths` in document order against the root mime defaults.
//!
//! Each pass stops at its first error. Warnings accumulate on the engine.

use serde::Serialize;
use std::fmt;

use crate::closure::ReferenceClosure;
use crate::config::ValidatorConfig;
use crate::definitions::DefinitionValidator;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Scope};
use crate::document::{ContractDocument, DEFINITIONS, PATHS};
use crate::error::Result;
use crate::metadata::MetadataProvider;
use crate::reporter::MessageReporter;
use crate::resources::{MimeResolution, ResourceValidator};

/// Counts for a run so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub definitions: usize,
    pub paths: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} definition(s), {} path(s) validated; {} error(s), {} warning(s)",
            self.definitions, self.paths, self.errors, self.warnings
        )
    }
}

/// Run-scoped validator for one (contract, implementation) pair
pub struct ValidationEngine<P> {
    document: ContractDocument,
    provider: P,
    config: ValidatorConfig,
    closure: ReferenceClosure,
    reporter: MessageReporter,
    definitions_validated: usize,
    paths_validated: usize,
}

impl<P: MetadataProvider> ValidationEngine<P> {
    /// Engine with the default configuration
    pub fn new(document: ContractDocument, provider: P) -> Self {
        Self::with_config(document, provider, ValidatorConfig::default())
    }

    pub fn with_config(document: ContractDocument, provider: P, config: ValidatorConfig) -> Self {
        Self {
            document,
            provider,
            config,
            closure: ReferenceClosure::new(),
            reporter: MessageReporter::new(),
            definitions_validated: 0,
            paths_validated: 0,
        }
    }

    /// Validate every definition, then the reference closure
    pub fn validate_definitions(&mut self) -> Result<()> {
        self.closure = ReferenceClosure::new();
        self.definitions_validated = 0;

        let Some(definitions) = self.document.definitions() else {
            return Err(self.reporter.error(missing_section(DEFINITIONS)));
        };
        tracing::info!(count = definitions.len(), "validating definitions");

        let validator = DefinitionValidator::new(&self.provider, &self.config);
        for (name, declaration) in definitions {
            validator.validate(name, declaration, &mut self.closure, &mut self.reporter)?;
            self.definitions_validated += 1;
        }

        if let Some(diagnostic) = self.closure.undefined_references() {
            return Err(self.reporter.error(diagnostic));
        }

        tracing::info!(validated = self.definitions_validated, "definitions valid");
        Ok(())
    }

    /// Validate every path against the root mime defaults
    pub fn validate_resources(&mut self) -> Result<()> {
        self.paths_validated = 0;

        let Some(paths) = self.document.paths() else {
            return Err(self.reporter.error(missing_section(PATHS)));
        };
        tracing::info!(count = paths.len(), "validating resources");

        let root_defaults = self.document.root_mimes();
        let validator = ResourceValidator::new(&self.provider, &self.config);
        for (path, declaration) in paths {
            validator.validate(path, declaration, &root_defaults, &mut self.reporter)?;
            self.paths_validated += 1;
        }

        tracing::info!(validated = self.paths_validated, "resources valid");
        Ok(())
    }

    /// Definitions pass, then resources pass
    pub fn validate_all(&mut self) -> Result<()> {
        self.validate_definitions()?;
        self.validate_resources()
    }

    /// Effective content types for the operations of one contract path
    pub fn mime_resolutions(&self, path: &str) -> Result<Vec<MimeResolution>> {
        let Some(declaration) = self.document.paths().and_then(|paths| paths.get(path)) else {
            return Err(Diagnostic::new(
                Scope::path(path),
                DiagnosticCode::MissingSection,
                format!("Path {} is not defined.", path),
            )
            .into());
        };

        ResourceValidator::new(&self.provider, &self.config).mime_resolutions(
            path,
            declaration,
            &self.document.root_mimes(),
        )
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.reporter.diagnostics().warnings().collect()
    }

    /// Everything reported so far, including the error that stopped a pass
    pub fn diagnostics(&self) -> &Diagnostics {
        self.reporter.diagnostics()
    }

    pub fn summary(&self) -> ValidationSummary {
        let diagnostics = self.reporter.diagnostics();
        ValidationSummary {
            definitions: self.definitions_validated,
            paths: self.paths_validated,
            warnings: diagnostics.warning_count(),
            errors: diagnostics.error_count(),
        }
    }

    pub fn closure(&self) -> &ReferenceClosure {
        &self.closure
    }

    pub fn document(&self) -> &ContractDocument {
        &self.document
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }
}

fn missing_section(section: &str) -> Diagnostic {
    Diagnostic::new(
        Scope::Document,
        DiagnosticCode::MissingSection,
        format!("Section '{}' is not defined.", section),
    )
}
