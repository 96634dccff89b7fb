use std::collections::HashMap;

use log::info;

use super::context::EmitContext;
use super::rule;
use super::writer::CodeWriter;
use crate::analyzers::output::{Analysis, GrammarAnalysis, GrammarDecl};
use crate::ast::{AstNode, AstNodeKind, NodeId};
use crate::error::ContractError;
use crate::info::GenerateInfo;

const HEADER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn emit_file(file: &AstNode, analysis: &Analysis, info: &GenerateInfo) -> Result<String, ContractError> {
    let namespace = info.require_namespace()?;
    let (preamble, grammars) = match &file.kind {
        AstNodeKind::File { preamble, grammars } => (preamble, grammars),
        _ => {
            return Err(ContractError::new(
                format!("expected a File node at the root, found {}", file.kind),
                "metagen.codegen.file",
            ));
        }
    };

    let source = info.source();
    let lines = info.line_index();
    let mut w = CodeWriter::new();

    w.write(&format!(
        "// IronMeta Generated {}: {} UTC\n",
        namespace,
        info.generated_at.format(HEADER_TIME_FORMAT)
    ));
    w.newline();

    for import in &analysis.default_imports {
        w.write(import);
        w.newline();
    }
    for node in preamble {
        match &node.kind {
            AstNodeKind::Using { target } => w.write(&format!("using {};", target.text(source).trim())),
            _ => w.write(node.text(source)),
        }
        w.newline();
    }
    w.newline();

    w.write(&format!("namespace {}\n", namespace));
    w.write("{\n");
    w.newline();

    for grammar in grammars {
        let grammar_analysis = analysis.grammar(grammar.get_id()).ok_or_else(|| {
            ContractError::new(
                format!("grammar at offset {} was not analyzed", grammar.span.start),
                "metagen.codegen.file",
            )
        })?;
        let ctx = EmitContext {
            info,
            analysis,
            grammar: grammar_analysis,
            lines: &lines,
        };
        emit_grammar(grammar, &ctx, &mut w, 1)?;
    }

    w.write(&format!("}} // namespace {}\n", namespace));
    Ok(w.into_string())
}

fn emit_grammar(grammar: &AstNode, ctx: &EmitContext<'_>, w: &mut CodeWriter, indent: usize) -> Result<(), ContractError> {
    let GrammarAnalysis { decl, rules: table, .. } = ctx.grammar;

    w.indented(indent, &format!("public partial class {} : {}\n", decl.class_name, decl.base_class));
    w.indented(indent, "{\n\n");

    w.indented(indent + 1, "/// <summary>Default Constructor.</summary>\n");
    w.indented(indent + 1, &format!("public {}()\n", decl.class_name));
    w.indented(indent + 2, &format!(": base(a => default({}), true)\n", decl.result_type));
    w.indented(indent + 1, "{\n");
    w.indented(indent + 1, "}\n\n");

    w.indented(indent + 1, "/// <summary>Constructor.</summary>\n");
    w.indented(
        indent + 1,
        &format!(
            "public {}(Func<{},{}> conv, bool strictPEG)\n",
            decl.class_name, decl.input_type, decl.result_type
        ),
    );
    w.indented(indent + 2, ": base(conv, strictPEG)\n");
    w.indented(indent + 1, "{\n");
    w.indented(indent + 1, "}\n\n");

    emit_match_item_class(decl, w, indent + 1);

    let mut nodes = HashMap::new();
    collect_rule_nodes(grammar, &mut nodes);
    for set in table.iter() {
        rule::emit_rule_set(set, &nodes, ctx, w, indent + 1)?;
    }

    w.newline();
    w.indented(indent, &format!("}} // class {}\n", decl.class_name));

    info!("generated class {} with {} rule(s)", decl.class_name, table.len());
    Ok(())
}

fn emit_match_item_class(decl: &GrammarDecl, w: &mut CodeWriter, indent: usize) {
    let item = &decl.match_item_class;

    w.indented(indent, "/// <summary>Utility class for referencing variables in conditions and actions.</summary>\n");
    w.indented(indent, &format!("private class {} : MatchItem\n", item));
    w.indented(indent, "{\n");

    w.indented(indent + 1, &format!("public {}() : base() {{ }}\n", item));
    w.indented(indent + 1, &format!("public {}(string name) : base(name) {{ }}\n", item));
    w.indented(indent + 1, &format!("public {}(MatchItem mi) : base(mi) {{ }}\n", item));
    w.newline();

    w.indented(
        indent + 1,
        &format!(
            "public static implicit operator {}({} item) {{ return item.Results.LastOrDefault(); }}\n",
            decl.result_type, item
        ),
    );
    w.indented(
        indent + 1,
        &format!(
            "public static implicit operator List<{}>({} item) {{ return item.Results.ToList(); }}\n",
            decl.result_type, item
        ),
    );

    if decl.input_type != decl.result_type {
        w.indented(
            indent + 1,
            &format!(
                "public static implicit operator {}({} item) {{ return item.Inputs.LastOrDefault(); }}\n",
                decl.input_type, item
            ),
        );
        w.indented(
            indent + 1,
            &format!(
                "public static implicit operator List<{}>({} item) {{ return item.Inputs.ToList(); }}\n",
                decl.input_type, item
            ),
        );
    }

    w.indented(indent, "}\n");
    w.newline();
}

fn collect_rule_nodes<'n>(node: &'n AstNode, out: &mut HashMap<NodeId, &'n AstNode>) {
    if let AstNodeKind::Rule { .. } = node.kind {
        out.insert(node.get_id(), node);
    } else {
        for child in node.children() {
            collect_rule_nodes(child, out);
        }
    }
}
