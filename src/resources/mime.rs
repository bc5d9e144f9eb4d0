//! Mime consistency
//!
//! Content types are declared at three levels, most specific first:
//! per-operation override, class default, root document default.
//!
//! Checks run in this order for one resource:
//! 1. every method-bound operation has `produces` and `consumes` somewhere
//!    in the override chain;
//! 2. root defaults agree with class defaults (`produces`, then `consumes`);
//! 3. each matched contract operation documents the same value the
//!    implementation declares (`consumes`, then `produces`).

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::config::ValidatorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Scope};
use crate::document::first_string;
use crate::error::Result;
use crate::metadata::{BackingType, HttpMethod, MimeDefaults, MimeKind, OperationMeta};
use crate::reporter::MessageReporter;

/// Level of the hierarchy a mime value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeLevel {
    Root,
    Class,
    Operation,
}

impl fmt::Display for MimeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Class => write!(f, "class"),
            Self::Operation => write!(f, "operation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMime {
    pub value: String,
    pub level: MimeLevel,
}

/// Effective content types of one implemented operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MimeResolution {
    pub method: HttpMethod,
    pub sub_path: String,
    pub consumes: Option<ResolvedMime>,
    pub produces: Option<ResolvedMime>,
}

impl MimeResolution {
    pub fn get(&self, kind: MimeKind) -> Option<&ResolvedMime> {
        match kind {
            MimeKind::Consumes => self.consumes.as_ref(),
            MimeKind::Produces => self.produces.as_ref(),
        }
    }
}

/// The value a contract operation documents for one mime kind.
/// A value written as `[x]` is unwrapped to `x`.
pub fn documented_mime(value: &Value) -> Option<String> {
    let raw = first_string(value)?;
    let trimmed = raw.trim();
    match trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => Some(inner.trim().to_string()),
        None => Some(trimmed.to_string()),
    }
}

fn label(kind: MimeKind) -> &'static str {
    match kind {
        MimeKind::Consumes => "Consumes",
        MimeKind::Produces => "Produces",
    }
}

/// Compares mime declarations of one resource across the three levels
pub struct MimeConsistencyResolver<'a> {
    backing: &'a BackingType,
    operations: &'a [OperationMeta],
    class_defaults: &'a MimeDefaults,
    root_defaults: &'a MimeDefaults,
    config: &'a ValidatorConfig,
    /// Sub-path left after stripping the base path
    remaining: &'a str,
    scope: Scope,
}

impl<'a> MimeConsistencyResolver<'a> {
    pub fn new(
        backing: &'a BackingType,
        operations: &'a [OperationMeta],
        class_defaults: &'a MimeDefaults,
        root_defaults: &'a MimeDefaults,
        config: &'a ValidatorConfig,
        remaining: &'a str,
        scope: Scope,
    ) -> Self {
        Self {
            backing,
            operations,
            class_defaults,
            root_defaults,
            config,
            remaining,
            scope,
        }
    }

    /// Run every check against a contract resource declaration
    pub fn check(&self, declaration: &Value, reporter: &mut MessageReporter) -> Result<()> {
        reporter.report_all(self.check_existence())?;
        reporter.report_all(self.check_root())?;
        reporter.report_all(self.check_operations(declaration))?;
        Ok(())
    }

    fn diagnostic(&self, code: DiagnosticCode, message: String) -> Diagnostic {
        Diagnostic::new(self.scope.clone(), code, message)
    }

    /// One diagnostic per mime kind a method-bound operation lacks at both levels
    pub fn check_existence(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for op in self.operations {
            let Some(method) = op.method else {
                continue;
            };
            let member = match op.sub_path.as_deref() {
                Some(sub_path) => format!("{} {}", method, sub_path),
                None => method.to_string(),
            };

            for kind in [MimeKind::Produces, MimeKind::Consumes] {
                if op.mime(kind).is_none() && self.class_defaults.get(kind).is_none() {
                    diagnostics.push(self.diagnostic(
                        DiagnosticCode::MimeAnnotationMissing,
                        format!(
                            "{} annotation is not found neither on {} level nor on method {}.",
                            label(kind),
                            self.backing,
                            member
                        ),
                    ));
                }
            }
        }

        diagnostics
    }

    /// Root defaults against class defaults, `produces` first
    pub fn check_root(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for kind in [MimeKind::Produces, MimeKind::Consumes] {
            let class = self.class_defaults.get(kind).filter(|v| !v.is_empty());
            let root = self.root_defaults.get(kind);

            if let (Some(class), Some(root)) = (class, root) {
                if !class.eq_ignore_ascii_case(root) {
                    diagnostics.push(self.diagnostic(
                        DiagnosticCode::RootMimeMismatch,
                        format!("{} root mime {} does not match {} defined in yaml.", label(kind), class, root),
                    ));
                }
            }
        }

        diagnostics
    }

    /// Documented per-operation values against the implementation, in
    /// document order, `consumes` before `produces`
    pub fn check_operations(&self, declaration: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (key, method, op_decl, op) in self.matched(declaration) {
            for kind in [MimeKind::Consumes, MimeKind::Produces] {
                let documented = op_decl.get(kind.key()).and_then(documented_mime);

                if let Some(declared) = op.mime(kind) {
                    if let Some(documented) = documented.filter(|d| d != declared) {
                        diagnostics.push(self.diagnostic(
                            DiagnosticCode::OperationMimeMismatch,
                            format!(
                                "{} mime {} of operation {} does not match {} declared on method {}.",
                                label(kind),
                                documented,
                                key,
                                declared,
                                method
                            ),
                        ));
                    }
                } else if let Some(class) = self.class_defaults.get(kind) {
                    if let Some(documented) = documented.filter(|d| !d.is_empty() && d != class) {
                        diagnostics.push(self.diagnostic(
                            DiagnosticCode::ClassMimeMismatch,
                            format!(
                                "{} mime {} of operation {} does not match {} declared on {}.",
                                label(kind),
                                documented,
                                key,
                                class,
                                self.backing
                            ),
                        ));
                    }
                }
            }
        }

        diagnostics
    }

    /// Effective content types of every matched contract operation
    pub fn resolutions(&self, declaration: &Value) -> Vec<MimeResolution> {
        self.matched(declaration)
            .into_iter()
            .map(|(_, method, _, op)| MimeResolution {
                method,
                sub_path: self.remaining.to_string(),
                consumes: self.resolve(op, MimeKind::Consumes),
                produces: self.resolve(op, MimeKind::Produces),
            })
            .collect()
    }

    fn resolve(&self, op: &OperationMeta, kind: MimeKind) -> Option<ResolvedMime> {
        let candidates = [
            (op.mime(kind), MimeLevel::Operation),
            (self.class_defaults.get(kind).filter(|v| !v.is_empty()), MimeLevel::Class),
            (self.root_defaults.get(kind), MimeLevel::Root),
        ];

        candidates.into_iter().find_map(|(value, level)| {
            value.map(|value| ResolvedMime {
                value: value.to_string(),
                level,
            })
        })
    }

    /// Contract operations (in document order) with their implementing operation.
    /// Unmatched keys are reported by the resource validator.
    fn matched<'d>(&self, declaration: &'d Value) -> Vec<(&'d str, HttpMethod, &'d Value, &'a OperationMeta)> {
        let Some(entries) = declaration.as_object() else {
            return Vec::new();
        };

        entries
            .iter()
            .filter(|(key, _)| !self.config.is_forbidden_operation(key))
            .filter_map(|(key, op_decl)| {
                let method = HttpMethod::from_key(key)?;
                let op = self
                    .operations
                    .iter()
                    .find(|op| op.implements(method, self.remaining))?;
                Some((key.as_str(), method, op_decl, op))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TypeKind;
    use serde_json::json;

    struct Fixture {
        backing: BackingType,
        operations: Vec<OperationMeta>,
        class_defaults: MimeDefaults,
        root_defaults: MimeDefaults,
        config: ValidatorConfig,
    }

    impl Fixture {
        fn new(operations: Vec<OperationMeta>, class_produces: Option<&str>) -> Self {
            Self {
                backing: BackingType::new("com.example.WidgetResource", TypeKind::Object),
                operations,
                class_defaults: MimeDefaults {
                    consumes: Some("application/json".to_string()),
                    produces: class_produces.map(str::to_string),
                },
                root_defaults: MimeDefaults::default(),
                config: ValidatorConfig::default(),
            }
        }

        fn resolver(&self) -> MimeConsistencyResolver<'_> {
            MimeConsistencyResolver::new(
                &self.backing,
                &self.operations,
                &self.class_defaults,
                &self.root_defaults,
                &self.config,
                "",
                Scope::path("/widgets"),
            )
        }
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_documented_mime_unwraps_brackets() {
        assert_eq!(documented_mime(&json!(["application/json"])).as_deref(), Some("application/json"));
        assert_eq!(documented_mime(&json!("[text/plain]")).as_deref(), Some("text/plain"));
        assert_eq!(documented_mime(&json!([])), None);
    }

    #[test]
    fn test_operation_override_wins() {
        let fixture = Fixture::new(
            vec![OperationMeta::new(HttpMethod::Get).with_produces("application/xml")],
            Some("application/json"),
        );
        let resolver = fixture.resolver();

        let stale = json!({"get": {"produces": ["application/json"]}});
        assert_eq!(codes(&resolver.check_operations(&stale)), vec![DiagnosticCode::OperationMimeMismatch]);

        let current = json!({"get": {"produces": ["application/xml"]}});
        assert!(resolver.check_operations(&current).is_empty());
    }

    #[test]
    fn test_class_default_compared_without_override() {
        let fixture = Fixture::new(vec![OperationMeta::new(HttpMethod::Post)], Some("application/json"));
        let resolver = fixture.resolver();

        let declaration = json!({"post": {"consumes": ["text/plain"], "produces": ["application/json"]}});
        let diagnostics = resolver.check_operations(&declaration);
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::ClassMimeMismatch]);
        assert!(diagnostics[0].message.starts_with("Consumes mime text/plain of operation post"));
    }

    #[test]
    fn test_documented_value_does_not_carry_over() {
        let fixture = Fixture::new(
            vec![
                OperationMeta::new(HttpMethod::Get).with_produces("application/xml"),
                OperationMeta::new(HttpMethod::Put).with_produces("application/xml"),
            ],
            Some("application/json"),
        );
        let declaration = json!({
            "get": {"produces": ["application/xml"]},
            "put": {},
        });
        assert!(fixture.resolver().check_operations(&declaration).is_empty());
    }

    #[test]
    fn test_root_check_ignores_case_and_empty_class_default() {
        let mut fixture = Fixture::new(vec![], Some("Application/JSON"));
        fixture.root_defaults.produces = Some("application/json".to_string());
        fixture.root_defaults.consumes = Some("application/xml".to_string());

        let diagnostics = fixture.resolver().check_root();
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::RootMimeMismatch]);
        assert_eq!(
            diagnostics[0].message,
            "Consumes root mime application/json does not match application/xml defined in yaml."
        );

        fixture.class_defaults.consumes = Some(String::new());
        assert!(fixture.resolver().check_root().is_empty());
    }

    #[test]
    fn test_existence_requires_both_kinds() {
        let fixture = Fixture::new(
            vec![
                OperationMeta::new(HttpMethod::Get),
                OperationMeta::new(HttpMethod::Post).with_produces("application/json"),
                OperationMeta {
                    sub_path: Some("/{id}/parts".to_string()),
                    ..Default::default()
                },
            ],
            None,
        );

        let diagnostics = fixture.resolver().check_existence();
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::MimeAnnotationMissing]);
        assert_eq!(
            diagnostics[0].message,
            "Produces annotation is not found neither on com.example.WidgetResource level nor on method GET."
        );
    }

    #[test]
    fn test_existence_names_each_missing_kind() {
        let mut fixture = Fixture::new(vec![OperationMeta::new(HttpMethod::Delete).with_sub_path("/{id}")], None);
        fixture.class_defaults.consumes = None;

        let messages: Vec<String> = fixture
            .resolver()
            .check_existence()
            .into_iter()
            .map(|d| d.message)
            .collect();
        let expected: Vec<String> = ["Produces", "Consumes"]
            .iter()
            .map(|kind| {
                format!(
                    "{} annotation is not found neither on {} level nor on method DELETE /{{id}}.",
                    kind, fixture.backing
                )
            })
            .collect();
        assert_eq!(messages, expected);
    }

    #[test]
    fn test_resolutions_report_levels() {
        let mut fixture = Fixture::new(
            vec![OperationMeta::new(HttpMethod::Get).with_produces("application/xml")],
            None,
        );
        fixture.class_defaults.consumes = None;
        fixture.root_defaults.consumes = Some("text/plain".to_string());

        let resolutions = fixture.resolver().resolutions(&json!({"get": {}, "delete": {}}));
        assert_eq!(resolutions.len(), 1);

        let get = &resolutions[0];
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.produces.as_ref().map(|m| m.level), Some(MimeLevel::Operation));
        assert_eq!(
            get.consumes,
            Some(ResolvedMime {
                value: "text/plain".to_string(),
                level: MimeLevel::Root,
            })
        );
    }
}
