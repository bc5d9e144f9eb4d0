//! Configuration management for contract checking
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (contract-check.toml)
//! - Environment variables (CONTRACT_CHECK__*)
//!
//! ## Example config file (contract-check.toml):
//! ```toml
//! [contract]
//! type_tag = "x-javaClass"
//!
//! [definitions]
//! property_kinds = ["ref", "enum", "type"]
//! forbidden_types = ["java.util.Date", "java.util.Calendar"]
//! unrecommended_types = ["java.lang.Long", "java.lang.Integer"]
//!
//! [resources]
//! forbidden_operations = ["options", "head"]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::definitions::PropertyKind;

/// Main configuration for a validation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Contract document conventions
    #[serde(default)]
    pub contract: ContractConfig,

    /// Definitions pass settings
    #[serde(default)]
    pub definitions: DefinitionsConfig,

    /// Resources pass settings
    #[serde(default)]
    pub resources: ResourcesConfig,
}

/// Contract document conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Key naming the backing implementation type
    #[serde(default = "default_type_tag")]
    pub type_tag: String,
}

/// Definitions pass configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsConfig {
    /// Enabled property-kind validators; order is precedence
    #[serde(default = "default_property_kinds")]
    pub property_kinds: Vec<PropertyKind>,

    /// Backing types that may never back a `type` property
    #[serde(default = "default_forbidden_types")]
    pub forbidden_types: Vec<String>,

    /// Backing types that only produce a warning
    #[serde(default = "default_unrecommended_types")]
    pub unrecommended_types: Vec<String>,
}

/// Resources pass configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Operation keys provided by the container
    #[serde(default = "default_forbidden_operations")]
    pub forbidden_operations: Vec<String>,
}

// Default value functions
fn default_type_tag() -> String {
    "x-javaClass".to_string()
}

fn default_property_kinds() -> Vec<PropertyKind> {
    vec![PropertyKind::Ref, PropertyKind::Enum, PropertyKind::Type]
}

fn default_forbidden_types() -> Vec<String> {
    vec!["java.util.Date".to_string(), "java.util.Calendar".to_string()]
}

fn default_unrecommended_types() -> Vec<String> {
    ["Long", "Float", "Integer", "Boolean", "Double", "Byte", "Character"]
        .iter()
        .map(|name| format!("java.lang.{}", name))
        .collect()
}

fn default_forbidden_operations() -> Vec<String> {
    vec!["options".to_string(), "head".to_string()]
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            type_tag: default_type_tag(),
        }
    }
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            property_kinds: default_property_kinds(),
            forbidden_types: default_forbidden_types(),
            unrecommended_types: default_unrecommended_types(),
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            forbidden_operations: default_forbidden_operations(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "contract-check.toml",
            ".contract-check.toml",
            "config/contract-check.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "contract-drift", "contract-check") {
            let xdg_config = config_dir.config_dir().join("contract-check.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (CONTRACT_CHECK__*)
        builder = builder.add_source(
            Environment::with_prefix("CONTRACT_CHECK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    pub fn type_tag(&self) -> &str {
        &self.contract.type_tag
    }

    pub fn is_forbidden_type(&self, name: &str) -> bool {
        self.definitions.forbidden_types.iter().any(|t| t == name)
    }

    pub fn is_unrecommended_type(&self, name: &str) -> bool {
        self.definitions.unrecommended_types.iter().any(|t| t == name)
    }

    /// Operation keys are compared lower-cased
    pub fn is_forbidden_operation(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.resources
            .forbidden_operations
            .iter()
            .any(|op| op.to_ascii_lowercase() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert_eq!(config.type_tag(), "x-javaClass");
        assert_eq!(
            config.definitions.property_kinds,
            vec![PropertyKind::Ref, PropertyKind::Enum, PropertyKind::Type]
        );
        assert!(config.is_forbidden_type("java.util.Date"));
        assert!(config.is_unrecommended_type("java.lang.Character"));
        assert!(!config.is_unrecommended_type("java.lang.String"));
        assert!(config.is_forbidden_operation("HEAD"));
        assert!(!config.is_forbidden_operation("get"));
    }

    #[test]
    fn test_serialize_config() {
        let config = ValidatorConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[contract]"));
        assert!(toml_str.contains("[definitions]"));
        assert!(toml_str.contains("[resources]"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ValidatorConfig = toml::from_str(
            r#"
[definitions]
property_kinds = ["type", "ref"]
"#,
        )
        .unwrap();
        assert_eq!(config.definitions.property_kinds, vec![PropertyKind::Type, PropertyKind::Ref]);
        assert_eq!(config.definitions.forbidden_types.len(), 2);
        assert_eq!(config.type_tag(), "x-javaClass");
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[contract]
type_tag = "x-backing"

[resources]
forbidden_operations = ["options"]
"#,
        )
        .unwrap();

        let config = ValidatorConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.type_tag(), "x-backing");
        assert!(!config.is_forbidden_operation("head"));
    }

    #[test]
    fn test_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let mut config = ValidatorConfig::default();
        config.definitions.forbidden_types.push("java.time.Instant".to_string());
        config.save(path.to_str().unwrap()).unwrap();

        let loaded: ValidatorConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(loaded.is_forbidden_type("java.time.Instant"));
    }
}
