//! Tree optimizer: associative flattening of nested choice and sequence
//! nodes. Every pass consumes a tree and returns a rebuilt one; node ids are
//! carried over so analysis side tables still apply to the result.

mod flatten;

use log::trace;

use crate::ast::AstNode;

use flatten::Folding;

/// Splices `Disjunction` children of a `Disjunction` into their parent.
pub fn fold_choices(tree: AstNode) -> AstNode {
    flatten::fold(tree, Folding::CHOICES)
}

/// Splices `Sequence` children of a `Sequence` into their parent.
pub fn fold_sequences(tree: AstNode) -> AstNode {
    flatten::fold(tree, Folding::SEQUENCES)
}

/// Both folds fused into one bottom-up walk.
pub fn optimize(tree: AstNode) -> AstNode {
    let before = count_nodes(&tree);
    let tree = flatten::fold(tree, Folding::ALL);
    trace!("flattening removed {} node(s)", before - count_nodes(&tree));
    tree
}

fn count_nodes(node: &AstNode) -> usize {
    1 + node.children().into_iter().map(count_nodes).sum::<usize>()
}
