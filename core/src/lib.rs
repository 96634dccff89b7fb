pub mod analyzers;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod info;
pub mod location;
pub mod opt;
pub mod source;

use std::io::Write;

pub use analyzers::{Analysis, analyze_semantic_rules};
pub use ast::{AstNode, AstNodeKind, UnaryOperator};
pub use codegen::{generate_into, generate_parser};
pub use error::{ContractError, Level, MetagenErrorExt, OutputError};
pub use info::{ChoiceMode, GenerateInfo};
pub use location::{LineIndex, Location, Span};
pub use opt::optimize;
pub use source::GrammarBundle;

pub fn generate_error_report<E: MetagenErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("METAGEN | {} | {} | {}", level, location, message)
}

/// Analyzes, flattens and renders one grammar file.
pub fn compile_grammar(file: AstNode, info: &GenerateInfo) -> Result<String, Box<dyn MetagenErrorExt>> {
    let analysis = analyze_semantic_rules(&file, info)?;
    let file = optimize(file);
    generate_parser(&file, &analysis, info)
}

/// Like [`compile_grammar`], writing the result to `sink` only on success.
pub fn compile_grammar_into<W: Write>(
    file: AstNode,
    info: &GenerateInfo,
    sink: W,
) -> Result<(), Box<dyn MetagenErrorExt>> {
    let analysis = analyze_semantic_rules(&file, info)?;
    let file = optimize(file);
    generate_into(&file, &analysis, info, sink)
}
