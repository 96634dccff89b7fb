//! Code synthesis: renders an analyzed, optimized grammar tree as host
//! source for the combinator matcher runtime.

mod context;
mod expr;
mod file;
mod rule;
mod writer;

use std::io::Write;

use crate::analyzers::output::Analysis;
use crate::ast::AstNode;
use crate::error::{MetagenErrorExt, OutputError};
use crate::info::GenerateInfo;

pub use context::EmitContext;
pub use writer::CodeWriter;

/// Renders the whole generated file into a string.
pub fn generate_parser(
    file: &AstNode,
    analysis: &Analysis,
    info: &GenerateInfo,
) -> Result<String, Box<dyn MetagenErrorExt>> {
    file::emit_file(file, analysis, info).map_err(|e| Box::new(e) as Box<dyn MetagenErrorExt>)
}

/// Renders the generated file and writes it to `sink`. Nothing is written
/// unless rendering succeeds; the sink is flushed before returning.
pub fn generate_into<W: Write>(
    file: &AstNode,
    analysis: &Analysis,
    info: &GenerateInfo,
    mut sink: W,
) -> Result<(), Box<dyn MetagenErrorExt>> {
    let text = generate_parser(file, analysis, info)?;
    sink.write_all(text.as_bytes())
        .and_then(|_| sink.flush())
        .map_err(|e| Box::new(OutputError::new(e, info.input_file_name.clone())) as Box<dyn MetagenErrorExt>)
}
