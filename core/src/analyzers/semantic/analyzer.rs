use log::info;

use super::context::AnalysisContext;
use super::decl::{self, PendingGrammar};
use super::err::SemanticError;
use super::resolve;
use crate::analyzers::output::Analysis;
use crate::ast::{AstNode, AstNodeKind};
use crate::error::Level;
use crate::info::GenerateInfo;

/// Walks a `File` tree in two phases: every grammar is walked first so the
/// rule-name set is complete, then identifiers are classified against it.
pub struct Analyzer<'a> {
    ctx: AnalysisContext<'a>,
    pending: Vec<PendingGrammar>,
    default_imports: Vec<String>,
}

impl<'a> Analyzer<'a> {
    pub fn new(info: &'a GenerateInfo) -> Self {
        Analyzer {
            ctx: AnalysisContext::new(info),
            pending: Vec::new(),
            default_imports: Vec::new(),
        }
    }

    pub fn analyze(&mut self, file: &AstNode) -> Result<(), SemanticError> {
        let (preamble, grammars) = match &file.kind {
            AstNodeKind::File { preamble, grammars } => (preamble, grammars),
            _ => {
                return Err(SemanticError::with(
                    Level::Error,
                    format!("Expected a File node at the root, found {}.", file.kind),
                    "metagen.analyzers.semantic.analyzer".to_string(),
                    Some(self.ctx.info.location_of(file.span.start)),
                    Some(file.span),
                ));
            }
        };

        self.default_imports = decl::default_imports(preamble, self.ctx.source());
        for grammar in grammars {
            let pending = decl::analyze_grammar(grammar, &mut self.ctx)?;
            self.pending.push(pending);
        }
        Ok(())
    }

    /// Classifies every recorded identifier and produces the final tables.
    pub fn finish(self) -> Analysis {
        let rule_names = self.ctx.into_rule_names();
        let analysis = resolve::finalize(self.pending, rule_names, self.default_imports);
        info!(
            "analyzed {} grammar(s), {} rule name(s)",
            analysis.grammars.len(),
            analysis.rule_names.len()
        );
        analysis
    }
}
