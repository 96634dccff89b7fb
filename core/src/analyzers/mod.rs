pub mod output;
pub mod semantic;

pub use output::{Analysis, ArgumentKind, GrammarAnalysis, GrammarDecl, Resolution};
pub use semantic::analyze_semantic_rules;
