//! Resources validation
//!
//! Checks one entry of the contract's `paths` section against its backing
//! resource type: path binding, mime consistency, then every declared
//! operation.

mod mime;

pub use mime::{documented_mime, MimeConsistencyResolver, MimeLevel, MimeResolution, ResolvedMime};

use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::definitions::resolve_backing_type;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Scope};
use crate::error::Result;
use crate::metadata::{BackingType, HttpMethod, MetadataProvider, MimeDefaults, OperationMeta};
use crate::reporter::MessageReporter;

const PARAMETERS: &str = "parameters";
const EXTENSION_PREFIX: &str = "x-";
const TAGS: &str = "tags";

/// A contract path bound to its backing resource type
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    pub backing: BackingType,
    pub base_path: String,
    /// Contract path with the base path stripped
    pub remaining: String,
    pub operations: Vec<OperationMeta>,
    pub class_defaults: MimeDefaults,
}

impl ResourceBinding {
    /// Verbs exposed at the bound sub-path
    pub fn exposed_methods(&self) -> Vec<HttpMethod> {
        self.operations
            .iter()
            .filter(|op| op.serves_sub_path(&self.remaining))
            .filter_map(|op| op.method)
            .collect()
    }

    pub fn find_operation(&self, method: HttpMethod) -> Option<&OperationMeta> {
        self.operations.iter().find(|op| op.implements(method, &self.remaining))
    }
}

/// True for keys that never name an operation
fn is_ignored_key(key: &str) -> bool {
    key.starts_with(EXTENSION_PREFIX) || key.eq_ignore_ascii_case(PARAMETERS)
}

/// Contract path with the base path removed, or `None` when it lies outside it.
///
/// A trailing `/` on either side is not a sub-path: `/` binds `/` and
/// `/parts/` binds `/parts/`. The remainder otherwise starts a new segment.
fn strip_base_path<'p>(path: &'p str, base_path: &str) -> Option<&'p str> {
    let remaining = path.strip_prefix(base_path.trim_end_matches('/'))?;
    match remaining {
        "" | "/" => Some(""),
        sub if sub.starts_with('/') => Some(sub),
        _ => None,
    }
}

/// Validates entries of `paths`
pub struct ResourceValidator<'a, P> {
    provider: &'a P,
    config: &'a ValidatorConfig,
}

impl<'a, P: MetadataProvider> ResourceValidator<'a, P> {
    pub fn new(provider: &'a P, config: &'a ValidatorConfig) -> Self {
        Self { provider, config }
    }

    /// Validate one path entry, stopping at its first error
    pub fn validate(
        &self,
        path: &str,
        declaration: &Value,
        root_defaults: &MimeDefaults,
        reporter: &mut MessageReporter,
    ) -> Result<()> {
        let scope = Scope::path(path);
        let binding = self.bind(path, declaration, reporter)?;
        tracing::debug!(path, backing = %binding.backing, remaining = %binding.remaining, "validating resource");

        self.mime_resolver(&binding, root_defaults, scope.clone())
            .check(declaration, reporter)?;

        let Some(entries) = declaration.as_object() else {
            return Ok(());
        };

        for (key, op_decl) in entries {
            if is_ignored_key(key) {
                continue;
            }

            if self.config.is_forbidden_operation(key) {
                reporter.warn(Diagnostic::new(
                    scope.clone(),
                    DiagnosticCode::ForbiddenOperationDeclared,
                    format!("Operation {} should not be defined. It's provided by the container.", key),
                ));
                continue;
            }

            let implemented = HttpMethod::from_key(key).and_then(|method| binding.find_operation(method));
            if implemented.is_none() {
                return Err(reporter.error(self.not_implemented(&scope, key, &binding)));
            }

            let has_tags = op_decl
                .get(TAGS)
                .and_then(Value::as_array)
                .map_or(false, |tags| !tags.is_empty());
            if !has_tags {
                return Err(reporter.fail(
                    scope.clone(),
                    DiagnosticCode::MissingTags,
                    format!("Tags must be defined for operation: {}", key),
                ));
            }
        }

        Ok(())
    }

    /// Resolve the backing type and match the contract path against its base path
    pub fn bind(&self, path: &str, declaration: &Value, reporter: &mut MessageReporter) -> Result<ResourceBinding> {
        let scope = Scope::path(path);
        let backing = resolve_backing_type(self.provider, self.config, scope.clone(), declaration, reporter)?;

        let Some(base_path) = self.provider.base_path(&backing) else {
            return Err(reporter.fail(
                scope,
                DiagnosticCode::PathAnnotationMissing,
                format!("Path annotation not found on {}", backing),
            ));
        };

        let Some(remaining) = strip_base_path(path, &base_path) else {
            return Err(reporter.fail(
                scope,
                DiagnosticCode::PathMismatch,
                format!("Path {} on annotation does not match {}", base_path, path),
            ));
        };

        let operations = self.provider.declared_operations(&backing);
        if !remaining.is_empty() && !operations.iter().any(|op| op.serves_sub_path(remaining)) {
            return Err(reporter.fail(
                scope,
                DiagnosticCode::NoMatchingSubPath,
                format!("No path annotation matches {} on {}", remaining, backing),
            ));
        }

        let class_defaults = self.provider.class_default_mimes(&backing);
        Ok(ResourceBinding {
            remaining: remaining.to_string(),
            backing,
            base_path,
            operations,
            class_defaults,
        })
    }

    /// Effective content types of every matched operation of a path entry
    pub fn mime_resolutions(
        &self,
        path: &str,
        declaration: &Value,
        root_defaults: &MimeDefaults,
    ) -> Result<Vec<MimeResolution>> {
        let mut reporter = MessageReporter::new();
        let binding = self.bind(path, declaration, &mut reporter)?;
        Ok(self
            .mime_resolver(&binding, root_defaults, Scope::path(path))
            .resolutions(declaration))
    }

    fn mime_resolver<'b>(
        &'b self,
        binding: &'b ResourceBinding,
        root_defaults: &'b MimeDefaults,
        scope: Scope,
    ) -> MimeConsistencyResolver<'b> {
        MimeConsistencyResolver::new(
            &binding.backing,
            &binding.operations,
            &binding.class_defaults,
            root_defaults,
            self.config,
            &binding.remaining,
            scope,
        )
    }

    fn not_implemented(&self, scope: &Scope, key: &str, binding: &ResourceBinding) -> Diagnostic {
        let exposed = binding.exposed_methods();
        let at = if binding.remaining.is_empty() {
            binding.base_path.clone()
        } else {
            format!("{}{}", binding.base_path.trim_end_matches('/'), binding.remaining)
        };
        let context = if exposed.is_empty() {
            format!("{} exposes no operations at {}", binding.backing, at)
        } else {
            let verbs: Vec<String> = exposed.iter().map(HttpMethod::to_string).collect();
            format!("{} exposes {} at {}", binding.backing, verbs.join(", "), at)
        };

        Diagnostic::new(
            scope.clone(),
            DiagnosticCode::OperationNotImplemented,
            format!(
                "Method annotated with {} operation not found in class {}",
                key.to_ascii_uppercase(),
                binding.backing
            ),
        )
        .with_context(context)
    }
}
