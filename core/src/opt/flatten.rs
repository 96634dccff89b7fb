//! file: core/src/opt/flatten.rs
//! description: splice same-kind grouping nodes into their parent.
//!
//! Children are rebuilt first, so a folded child never contains a foldable
//! grandchild and a single splice per level is enough. Only a direct
//! same-kind child is spliced; a `Sequence` under a `Bound`, `Action`,
//! `Condition` or `Unary` keeps its own node.

use crate::ast::{AstNode, AstNodeKind};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Folding {
    choices: bool,
    sequences: bool,
}

impl Folding {
    pub(crate) const CHOICES: Folding = Folding { choices: true, sequences: false };
    pub(crate) const SEQUENCES: Folding = Folding { choices: false, sequences: true };
    pub(crate) const ALL: Folding = Folding { choices: true, sequences: true };
}

pub(crate) fn fold(mut node: AstNode, folding: Folding) -> AstNode {
    let kind = std::mem::replace(&mut node.kind, AstNodeKind::Any);
    let kind = match kind {
        AstNodeKind::Sequence { items } => {
            let items = fold_all(items, folding);
            AstNodeKind::Sequence {
                items: if folding.sequences { splice(items, unwrap_sequence) } else { items },
            }
        }
        AstNodeKind::Disjunction { alternatives } => {
            let alternatives = fold_all(alternatives, folding);
            AstNodeKind::Disjunction {
                alternatives: if folding.choices {
                    splice(alternatives, unwrap_disjunction)
                } else {
                    alternatives
                },
            }
        }

        AstNodeKind::File { preamble, grammars } => AstNodeKind::File {
            preamble,
            grammars: fold_all(grammars, folding),
        },
        AstNodeKind::Grammar { decl, body } => AstNodeKind::Grammar {
            decl,
            body: fold_all(body, folding),
        },
        AstNodeKind::Rule { is_override, name, params, body } => AstNodeKind::Rule {
            is_override,
            name,
            params: params.map(|p| fold_box(p, folding)),
            body: fold_box(body, folding),
        },
        AstNodeKind::RuleCall { name, args } => AstNodeKind::RuleCall {
            name,
            args: fold_all(args, folding),
        },
        AstNodeKind::Unary { op, operand } => AstNodeKind::Unary {
            op,
            operand: fold_box(operand, folding),
        },
        AstNodeKind::Bound { operand, variable } => AstNodeKind::Bound {
            operand: fold_box(operand, folding),
            variable,
        },
        AstNodeKind::Condition { operand, condition } => AstNodeKind::Condition {
            operand: fold_box(operand, folding),
            condition,
        },
        AstNodeKind::Action { operand, action } => AstNodeKind::Action {
            operand: fold_box(operand, folding),
            action,
        },

        leaf @ (AstNodeKind::Using { .. }
        | AstNodeKind::Comment
        | AstNodeKind::GrammarDecl { .. }
        | AstNodeKind::GenericName { .. }
        | AstNodeKind::Code
        | AstNodeKind::Literal
        | AstNodeKind::CallOrVar
        | AstNodeKind::Any
        | AstNodeKind::Fail { .. }) => leaf,
    };
    node.with_kind(kind)
}

fn fold_all(nodes: Vec<AstNode>, folding: Folding) -> Vec<AstNode> {
    nodes.into_iter().map(|n| fold(n, folding)).collect()
}

fn fold_box(node: Box<AstNode>, folding: Folding) -> Box<AstNode> {
    Box::new(fold(*node, folding))
}

fn splice(children: Vec<AstNode>, unwrap: fn(AstNode) -> Result<Vec<AstNode>, AstNode>) -> Vec<AstNode> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match unwrap(child) {
            Ok(grandchildren) => out.extend(grandchildren),
            Err(child) => out.push(child),
        }
    }
    out
}

fn unwrap_sequence(node: AstNode) -> Result<Vec<AstNode>, AstNode> {
    match node.kind {
        AstNodeKind::Sequence { items } => Ok(items),
        _ => Err(node),
    }
}

fn unwrap_disjunction(node: AstNode) -> Result<Vec<AstNode>, AstNode> {
    match node.kind {
        AstNodeKind::Disjunction { alternatives } => Ok(alternatives),
        _ => Err(node),
    }
}
