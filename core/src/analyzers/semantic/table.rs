use indexmap::IndexMap;

use super::scope::RuleScope;
use crate::ast::NodeId;

/// One rule definition contributing a branch to its alternative set.
#[derive(Debug, Clone)]
pub struct Alternative {
    pub rule_id: NodeId,
    pub is_override: bool,
    pub scope: RuleScope,
}

/// All definitions sharing one rule name, in declaration order.
#[derive(Debug, Clone)]
pub struct AlternativeSet {
    name: String,
    alternatives: Vec<Alternative>,
    cacheable: bool,
}

impl AlternativeSet {
    fn new(name: String) -> Self {
        AlternativeSet {
            name,
            alternatives: Vec::new(),
            cacheable: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub(crate) fn alternatives_mut(&mut self) -> &mut [Alternative] {
        &mut self.alternatives
    }

    /// Any alternative marked override makes the whole set an override.
    pub fn is_override(&self) -> bool {
        self.alternatives.iter().any(|a| a.is_override)
    }

    pub fn is_mixed_override(&self) -> bool {
        self.is_override() && self.alternatives.iter().any(|a| !a.is_override)
    }

    /// Whether the combinator tree can be built once and shared by every call.
    /// Only meaningful after finalization.
    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    pub(crate) fn set_cacheable(&mut self, cacheable: bool) {
        self.cacheable = cacheable;
    }
}

/// Rule name -> alternative set, insertion order preserved.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    sets: IndexMap<String, AlternativeSet>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_alternative(&mut self, name: &str, alternative: Alternative) {
        self.sets
            .entry(name.to_string())
            .or_insert_with(|| AlternativeSet::new(name.to_string()))
            .alternatives
            .push(alternative);
    }

    pub fn get(&self, name: &str) -> Option<&AlternativeSet> {
        self.sets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlternativeSet> {
        self.sets.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut AlternativeSet> {
        self.sets.values_mut()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
