//! Reference closure
//!
//! Tracks which `$ref` targets have been validated (`checked`) and which
//! have only been referenced so far (`unchecked`). The `$ref` edges are kept
//! in a petgraph `DiGraph` so a dangling reference can name its referrers.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

use crate::diagnostics::{Diagnostic, DiagnosticCode, Scope};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Minimum fuzzy score for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: i64 = 40;

/// Definition name targeted by a `$ref` value
pub fn definition_name(reference: &str) -> &str {
    if let Some(name) = reference.strip_prefix(DEFINITIONS_PREFIX) {
        return name;
    }
    if reference.starts_with("#/") {
        return reference.rsplit('/').next().unwrap_or(reference);
    }
    reference
}

/// Run-scoped `$ref` bookkeeping
#[derive(Debug, Default)]
pub struct ReferenceClosure {
    checked: BTreeSet<String>,
    unchecked: BTreeSet<String>,

    /// referrer -> referenced definition
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl ReferenceClosure {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Record that `from` references `to`
    pub fn register_reference(&mut self, from: &str, to: &str) {
        let from_idx = self.node(from);
        let to_idx = self.node(to);
        self.graph.update_edge(from_idx, to_idx, ());

        if !self.checked.contains(to) {
            self.unchecked.insert(to.to_string());
        }
    }

    /// Record that `name` has been validated
    pub fn mark_checked(&mut self, name: &str) {
        self.node(name);
        self.unchecked.remove(name);
        self.checked.insert(name.to_string());
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked.contains(name)
    }

    /// Referenced but never validated, sorted
    pub fn unresolved(&self) -> Vec<&str> {
        self.unchecked
            .iter()
            .filter(|name| !self.checked.contains(*name))
            .map(String::as_str)
            .collect()
    }

    /// Definitions that reference `name`, sorted
    pub fn referrers(&self, name: &str) -> Vec<&str> {
        let Some(&node_idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut referrers: Vec<&str> = self
            .graph
            .edges_directed(node_idx, Direction::Incoming)
            .filter_map(|e| self.graph.node_weight(e.source()))
            .map(String::as_str)
            .collect();
        referrers.sort_unstable();
        referrers
    }

    /// Closest checked name to `name`, if any is a reasonable fuzzy match
    pub fn suggestion(&self, name: &str) -> Option<&str> {
        let matcher = SkimMatcherV2::default().ignore_case();

        self.checked
            .iter()
            .filter_map(|candidate| {
                let score = matcher
                    .fuzzy_match(candidate, name)
                    .or_else(|| matcher.fuzzy_match(name, candidate))?;
                Some((score, candidate.as_str()))
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .map(|(_, candidate)| candidate)
    }

    /// The aggregated failure for every dangling reference, if any
    pub fn undefined_references(&self) -> Option<Diagnostic> {
        let unresolved = self.unresolved();
        if unresolved.is_empty() {
            return None;
        }

        let mut diagnostic = Diagnostic::new(
            Scope::Document,
            DiagnosticCode::UndefinedReference,
            format!("Undefined reference: [{}]", unresolved.join(", ")),
        );

        for name in unresolved {
            let referrers = self.referrers(name);
            if !referrers.is_empty() {
                diagnostic = diagnostic.with_context(format!("{} referenced by: {}", name, referrers.join(", ")));
            }
            if let Some(similar) = self.suggestion(name) {
                diagnostic = diagnostic.with_context(format!("{}: did you mean '{}'?", name, similar));
            }
        }

        Some(diagnostic)
    }
}
