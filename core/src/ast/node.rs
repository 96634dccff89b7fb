use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::location::{LineIndex, Span};

use super::kind::AstNodeKind;

/// Process-unique node identifier; analysis side tables are keyed by it.
pub type NodeId = usize;

#[derive(Clone, Serialize, Deserialize)]
pub struct AstNode {
    #[serde(skip, default = "AstNode::create_id")]
    id: NodeId,
    #[serde(flatten)]
    pub kind: AstNodeKind,
    #[serde(flatten)]
    pub span: Span,
    #[serde(skip)]
    text: OnceCell<String>,
    #[serde(skip)]
    position: OnceCell<(usize, usize)>,
}

impl AstNode {
    fn create_id() -> NodeId {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(1);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }

    pub fn new(kind: AstNodeKind, span: Span) -> Self {
        AstNode {
            id: Self::create_id(),
            kind,
            span,
            text: OnceCell::new(),
            position: OnceCell::new(),
        }
    }

    /// Rebuilds this node around a new kind, keeping its identity, span and
    /// memoized text and position.
    pub fn with_kind(self, kind: AstNodeKind) -> Self {
        AstNode { kind, ..self }
    }

    pub fn get_id(&self) -> NodeId {
        self.id
    }
    pub fn get_kind(&self) -> &AstNodeKind {
        &self.kind
    }
    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> Vec<&AstNode> {
        self.kind.children()
    }

    /// The exact source text covered by this node, sliced once and cached.
    ///
    /// # Panics
    ///
    /// If the span lies outside `source` or splits a character. Spans come
    /// from the upstream parser over the same source, so this is an invariant
    /// violation rather than a recoverable error.
    pub fn text(&self, source: &str) -> &str {
        self.text
            .get_or_init(|| source[self.span.start..self.span.next].to_string())
    }

    /// 1-based `(line, column)` of the node start, computed once.
    pub fn position(&self, index: &LineIndex<'_>) -> (usize, usize) {
        *self.position.get_or_init(|| index.locate(self.span.start))
    }

    /// The position stamped by `position` or `assign_positions`, if any.
    pub fn cached_position(&self) -> Option<(usize, usize)> {
        self.position.get().copied()
    }

    /// Stamps the position of this node and every descendant.
    pub fn assign_positions(&self, index: &LineIndex<'_>) {
        self.position(index);
        for child in self.children() {
            child.assign_positions(index);
        }
    }
}

/// Structural equality: kind and span. Ids and memo cells are ignored.
impl PartialEq for AstNode {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span && self.kind == other.kind
    }
}

use std::fmt;

impl fmt::Debug for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstNode")
            .field("id", &self.id)
            .field("span", &format_args!("{}", self.span))
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_tree(node: &AstNode, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
            for _ in 0..indent {
                write!(f, "  ")?;
            }
            writeln!(f, "{} [{}] #{}", node.kind, node.span, node.id)?;
            for child in node.children() {
                write_tree(child, f, indent + 1)?;
            }
            Ok(())
        }

        write_tree(self, f, 0)
    }
}
