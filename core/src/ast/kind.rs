//! file: core/src/ast/kind.rs
//! description: grammar tree node kinds and the unary operator enum.
//!
//! Defines `AstNodeKind` along with `UnaryOperator`. The upstream grammar
//! parser produces these; analysis, optimization and code synthesis all
//! dispatch on them with exhaustive matches.
//!
use serde::{Deserialize, Serialize};

use super::node::AstNode;

/// Prefix operators on a single expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Optional,          // ?
    OneOrMore,         // +
    ZeroOrMore,        // *
    Lookahead,         // &
    NegativeLookahead, // ~
}

impl UnaryOperator {
    /// Name of the runtime combinator this operator wraps its operand in.
    pub fn combinator(&self) -> &'static str {
        match self {
            UnaryOperator::Optional => "_QUES",
            UnaryOperator::OneOrMore => "_PLUS",
            UnaryOperator::ZeroOrMore => "_STAR",
            UnaryOperator::Lookahead => "_LOOK",
            UnaryOperator::NegativeLookahead => "_NOT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AstNodeKind {
    File { preamble: Vec<AstNode>, grammars: Vec<AstNode> },
    Using { target: Box<AstNode> },
    Comment,

    Grammar { decl: Box<AstNode>, body: Vec<AstNode> },
    GrammarDecl { name: Box<AstNode>, base: Option<Box<AstNode>> },
    GenericName { name: Box<AstNode>, parameters: Vec<AstNode> },
    /// Verbatim host-language text.
    Code,

    Rule {
        is_override: bool,
        name: Box<AstNode>,
        params: Option<Box<AstNode>>,
        body: Box<AstNode>,
    },

    Literal,
    CallOrVar,
    RuleCall { name: Box<AstNode>, args: Vec<AstNode> },
    Any,
    Unary { op: UnaryOperator, operand: Box<AstNode> },
    Bound { operand: Box<AstNode>, variable: Box<AstNode> },
    Condition { operand: Box<AstNode>, condition: Box<AstNode> },
    Action { operand: Box<AstNode>, action: Box<AstNode> },
    Sequence { items: Vec<AstNode> },
    Disjunction { alternatives: Vec<AstNode> },
    Fail { message: Box<AstNode> },
}

impl AstNodeKind {
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            AstNodeKind::Literal
                | AstNodeKind::CallOrVar
                | AstNodeKind::RuleCall { .. }
                | AstNodeKind::Any
                | AstNodeKind::Unary { .. }
                | AstNodeKind::Bound { .. }
                | AstNodeKind::Condition { .. }
                | AstNodeKind::Action { .. }
                | AstNodeKind::Sequence { .. }
                | AstNodeKind::Disjunction { .. }
                | AstNodeKind::Fail { .. }
        )
    }

    /// Owned children in source order. Leaves return an empty list.
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            AstNodeKind::File { preamble, grammars } => preamble.iter().chain(grammars.iter()).collect(),
            AstNodeKind::Using { target } => vec![target.as_ref()],
            AstNodeKind::Grammar { decl, body } => std::iter::once(decl.as_ref()).chain(body.iter()).collect(),
            AstNodeKind::GrammarDecl { name, base } => {
                std::iter::once(name.as_ref()).chain(base.as_deref()).collect()
            }
            AstNodeKind::GenericName { name, parameters } => {
                std::iter::once(name.as_ref()).chain(parameters.iter()).collect()
            }
            AstNodeKind::Rule { name, params, body, .. } => std::iter::once(name.as_ref())
                .chain(params.as_deref())
                .chain(std::iter::once(body.as_ref()))
                .collect(),
            AstNodeKind::RuleCall { name, args } => std::iter::once(name.as_ref()).chain(args.iter()).collect(),
            AstNodeKind::Unary { operand, .. } => vec![operand.as_ref()],
            AstNodeKind::Bound { operand, variable } => vec![operand.as_ref(), variable.as_ref()],
            AstNodeKind::Condition { operand, condition } => vec![operand.as_ref(), condition.as_ref()],
            AstNodeKind::Action { operand, action } => vec![operand.as_ref(), action.as_ref()],
            AstNodeKind::Sequence { items } => items.iter().collect(),
            AstNodeKind::Disjunction { alternatives } => alternatives.iter().collect(),
            AstNodeKind::Fail { message } => vec![message.as_ref()],
            AstNodeKind::Comment
            | AstNodeKind::Code
            | AstNodeKind::Literal
            | AstNodeKind::CallOrVar
            | AstNodeKind::Any => Vec::new(),
        }
    }
}

use std::fmt;

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNodeKind::File { .. } => write!(f, "File"),
            AstNodeKind::Using { .. } => write!(f, "Using"),
            AstNodeKind::Comment => write!(f, "Comment"),
            AstNodeKind::Grammar { .. } => write!(f, "Grammar"),
            AstNodeKind::GrammarDecl { .. } => write!(f, "GrammarDecl"),
            AstNodeKind::GenericName { .. } => write!(f, "GenericName"),
            AstNodeKind::Code => write!(f, "Code"),
            AstNodeKind::Rule { .. } => write!(f, "Rule"),
            AstNodeKind::Literal => write!(f, "Literal"),
            AstNodeKind::CallOrVar => write!(f, "CallOrVar"),
            AstNodeKind::RuleCall { .. } => write!(f, "RuleCall"),
            AstNodeKind::Any => write!(f, "Any"),
            AstNodeKind::Unary { .. } => write!(f, "Unary"),
            AstNodeKind::Bound { .. } => write!(f, "Bound"),
            AstNodeKind::Condition { .. } => write!(f, "Condition"),
            AstNodeKind::Action { .. } => write!(f, "Action"),
            AstNodeKind::Sequence { .. } => write!(f, "Sequence"),
            AstNodeKind::Disjunction { .. } => write!(f, "Disjunction"),
            AstNodeKind::Fail { .. } => write!(f, "Fail"),
        }
    }
}
