//! Analyzer output types.
//!
//! `Analysis` carries everything code synthesis needs from the analysis pass:
//! the file-wide rule-name set, per-grammar declaration metadata and rule
//! tables, and the final classification of every identifier, keyed by the
//! node that holds it. Synthesis reads these tables and never classifies a
//! name on its own.

use std::collections::{HashMap, HashSet};

use crate::analyzers::semantic::table::RuleTable;
use crate::ast::NodeId;

/// Default base class for grammars that do not name one.
pub const DEFAULT_MATCHER_BASE: &str = "IronMeta.Matcher";

#[derive(Debug, Clone)]
pub struct Analysis {
    pub rule_names: HashSet<String>,
    pub grammars: Vec<GrammarAnalysis>,
    /// `using` directives to emit ahead of the preamble.
    pub default_imports: Vec<String>,
    pub(crate) resolutions: HashMap<NodeId, Resolution>,
    pub(crate) arguments: HashMap<NodeId, ArgumentKind>,
}

impl Analysis {
    pub fn is_rule(&self, name: &str) -> bool {
        self.rule_names.contains(name)
    }

    /// Classification of a `CallOrVar` node or of a `RuleCall` callee.
    pub fn resolution(&self, node: NodeId) -> Option<&Resolution> {
        self.resolutions.get(&node)
    }

    /// Classification of one `RuleCall` argument.
    pub fn argument(&self, node: NodeId) -> Option<ArgumentKind> {
        self.arguments.get(&node).copied()
    }

    pub fn grammar(&self, node: NodeId) -> Option<&GrammarAnalysis> {
        self.grammars.iter().find(|g| g.node_id == node)
    }
}

#[derive(Debug, Clone)]
pub struct GrammarAnalysis {
    pub node_id: NodeId,
    pub decl: GrammarDecl,
    pub rules: RuleTable,
}

/// Resolved naming and typing for one grammar class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarDecl {
    pub name: String,
    pub class_name: String,
    pub match_item_class: String,
    pub input_type: String,
    pub result_type: String,
    pub base_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Rule { name: String, bypass_virtual: bool },
    Variable { name: String },
}

impl Resolution {
    pub fn is_rule(&self) -> bool {
        matches!(self, Resolution::Rule { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Names a rule; passed as a sub-match.
    Rule,
    /// A variable of the calling rule; passed through.
    Variable,
    /// Anything else; converted through the matcher's conversion hook.
    Value,
}
