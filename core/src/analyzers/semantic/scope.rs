use std::collections::HashSet;

use indexmap::IndexSet;

use crate::ast::NodeId;

/// An identifier as it was written, before the rule-name set is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawName {
    /// Unqualified; rule call or variable depending on the final rule set.
    Bare(String),
    /// Qualified; always a rule call. `bypass_virtual` is set for
    /// `base.`/`super.` qualifiers, which call the ancestor's implementation.
    Qualified { name: String, bypass_virtual: bool },
}

/// Names seen inside one rule alternative.
#[derive(Debug, Clone, Default)]
pub struct RuleScope {
    variables: IndexSet<String>,
    bound: IndexSet<String>,
    slots: Vec<String>,
    pub(crate) names: Vec<(NodeId, RawName)>,
    pub(crate) callees: Vec<(NodeId, RawName)>,
    pub(crate) arguments: Vec<(NodeId, String)>,
}

impl RuleScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bare identifier used as an expression.
    pub fn add_reference(&mut self, name: &str) {
        self.variables.insert(name.to_string());
    }

    /// Target of a `Bound` node.
    pub fn add_binding(&mut self, name: &str) {
        self.variables.insert(name.to_string());
        self.bound.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    /// Every bare identifier and bound name, in first-seen order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(String::as_str)
    }

    pub fn bound(&self) -> impl Iterator<Item = &str> {
        self.bound.iter().map(String::as_str)
    }

    pub fn has_bindings(&self) -> bool {
        !self.bound.is_empty()
    }

    /// Variable slots the rule function must declare per invocation. Empty
    /// until the scope is finalized.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub(crate) fn finalize(&mut self, rule_names: &HashSet<String>) {
        self.slots = self
            .variables
            .iter()
            .filter(|v| self.bound.contains(*v) || !rule_names.contains(*v))
            .cloned()
            .collect();
    }
}
