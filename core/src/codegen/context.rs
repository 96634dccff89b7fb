//! file: core/src/codegen/context.rs
//! description: read-only state shared by every emitter of one grammar.
//!
//! `EmitContext` pairs the generation settings with the finished analysis
//! and the grammar currently being emitted. Emitters look identifiers up
//! here by node id; a missing entry means the tree handed to synthesis is
//! not the tree that was analyzed.

use crate::analyzers::output::{Analysis, ArgumentKind, GrammarAnalysis, GrammarDecl, Resolution};
use crate::ast::AstNode;
use crate::error::ContractError;
use crate::info::GenerateInfo;
use crate::location::LineIndex;

pub struct EmitContext<'a> {
    pub info: &'a GenerateInfo,
    pub analysis: &'a Analysis,
    pub grammar: &'a GrammarAnalysis,
    pub lines: &'a LineIndex<'a>,
}

impl<'a> EmitContext<'a> {
    pub fn source(&self) -> &'a str {
        self.info.source()
    }

    pub fn decl(&self) -> &'a GrammarDecl {
        &self.grammar.decl
    }

    pub fn resolution(&self, node: &AstNode) -> Result<&'a Resolution, ContractError> {
        self.analysis.resolution(node.get_id()).ok_or_else(|| {
            ContractError::new(
                format!(
                    "identifier `{}` at offset {} was not classified by analysis",
                    node.text(self.source()).trim(),
                    node.span.start
                ),
                "metagen.codegen.context",
            )
        })
    }

    pub fn argument(&self, node: &AstNode) -> Result<ArgumentKind, ContractError> {
        self.analysis.argument(node.get_id()).ok_or_else(|| {
            ContractError::new(
                format!(
                    "rule argument `{}` at offset {} was not classified by analysis",
                    node.text(self.source()).trim(),
                    node.span.start
                ),
                "metagen.codegen.context",
            )
        })
    }

    /// 1-based `(line, column)` of a node in the grammar source.
    pub fn position(&self, node: &AstNode) -> (usize, usize) {
        node.position(self.lines)
    }
}
