//! Error types for contract validation

use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Result type for contract operations
pub type Result<T> = std::result::Result<T, ContractError>;

/// Contract validation errors
#[derive(Error, Debug)]
pub enum ContractError {
    /// A validation pass aborted on its first fatal diagnostic
    #[error("{0}")]
    Validation(Box<Diagnostic>),

    #[error("Type not found: {0}")]
    TypeNotFound(String),

    #[error("Invalid contract document: {0}")]
    InvalidDocument(String),

    #[error("Invalid type catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl ContractError {
    /// Wrap a fatal diagnostic
    pub fn validation(diagnostic: Diagnostic) -> Self {
        Self::Validation(Box::new(diagnostic))
    }

    /// The diagnostic behind a validation failure
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Validation(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }

    /// The diagnostic code behind a validation failure
    pub fn code(&self) -> Option<DiagnosticCode> {
        self.diagnostic().map(|d| d.code)
    }

    /// True when this error is a validation failure rather than a load or setup error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<Diagnostic> for ContractError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::validation(diagnostic)
    }
}
