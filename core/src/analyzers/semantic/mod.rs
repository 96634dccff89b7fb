use crate::analyzers::output::Analysis;
use crate::ast::AstNode;
use crate::error::MetagenErrorExt;
use crate::info::GenerateInfo;

mod analyzer;
mod context;
mod decl;
mod err;
mod expr;
mod resolve;
pub mod scope;
pub mod table;

pub use analyzer::Analyzer;
pub use err::SemanticError;
pub use scope::{RawName, RuleScope};
pub use table::{Alternative, AlternativeSet, RuleTable};

/// Runs the analysis pass over a `File` tree.
pub fn analyze_semantic_rules(
    file: &AstNode,
    info: &GenerateInfo,
) -> Result<Analysis, Box<dyn MetagenErrorExt>> {
    let mut analyzer = Analyzer::new(info);
    analyzer.analyze(file).map_err(|e| Box::new(e) as Box<dyn MetagenErrorExt>)?;
    Ok(analyzer.finish())
}
