pub mod build;
pub mod err;
pub mod kind;
pub mod node;

pub use err::SyntaxError;
pub use kind::{AstNodeKind, UnaryOperator};
pub use node::{AstNode, NodeId};

/// Reads a tree serialized by an upstream grammar parser.
pub fn tree_from_json(json: &str) -> Result<AstNode, SyntaxError> {
    serde_json::from_str(json).map_err(|e| {
        SyntaxError::new(0, format!("malformed grammar tree at line {} column {}: {}", e.line(), e.column(), e))
    })
}
