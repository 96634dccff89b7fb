use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::{AstNode, SyntaxError};
use crate::info::GenerateInfo;

/// A grammar source together with the tree an upstream parser built for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarBundle {
    /// Name of the grammar file, used in `#line` directives.
    pub file: String,
    pub source: String,
    pub tree: AstNode,
}

impl GrammarBundle {
    pub fn from_json(json: &str) -> Result<Self, SyntaxError> {
        let bundle: GrammarBundle = serde_json::from_str(json).map_err(|e| {
            SyntaxError::new(0, format!("malformed grammar bundle at line {} column {}: {}", e.line(), e.column(), e))
        })?;
        if let Some(node) = first_bad_span(&bundle.tree, &bundle.source) {
            return Err(SyntaxError::new(
                node.span.start,
                format!(
                    "{} node spans {} which does not fit the {} byte source of {}",
                    node.kind,
                    node.span,
                    bundle.source.len(),
                    bundle.file
                ),
            ));
        }
        Ok(bundle)
    }

    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty()
    }

    /// File name without directories or extension.
    pub fn stem(&self) -> String {
        Path::new(&self.file)
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    pub fn generate_info(&self) -> GenerateInfo {
        GenerateInfo::new(self.file.clone(), self.source.clone())
    }
}

/// Every span must be well-formed, in bounds and on character boundaries before any
/// node text is sliced.
fn first_bad_span<'n>(node: &'n AstNode, source: &str) -> Option<&'n AstNode> {
    let span = node.span;
    let fits = span.start <= span.next
        && span.next <= source.len()
        && source.is_char_boundary(span.start)
        && source.is_char_boundary(span.next);
    if !fits {
        return Some(node);
    }
    node.children().into_iter().find_map(|child| first_bad_span(child, source))
}

impl std::fmt::Display for GrammarBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grammar: {} ({} bytes)", self.file, self.source.len())
    }
}
