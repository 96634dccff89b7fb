use super::context::EmitContext;
use super::writer::CodeWriter;
use crate::analyzers::output::{ArgumentKind, Resolution};
use crate::ast::{AstNode, AstNodeKind};
use crate::error::ContractError;

/// Markers that expose the match result to embedded host code.
const MATCH_RESULT_MARKERS: [&str; 3] = ["_IM_Result", "_IM_Start", "_IM_Next"];

fn default_vars(item_class: &str) -> String {
    format!(
        "var _IM_Result = new {}(_IM_Result_MI_); int _IM_StartIndex = _IM_Result.StartIndex; int _IM_NextIndex = _IM_Result.NextIndex;",
        item_class
    )
}

fn uses_match_result(text: &str) -> bool {
    MATCH_RESULT_MARKERS.iter().any(|marker| text.contains(marker))
}

fn call_target(name: &str, bypass_virtual: bool) -> String {
    if bypass_virtual {
        format!("base.{}", name)
    } else {
        name.to_string()
    }
}

/// Emits a rule definition's combinator expression, wrapping it in
/// `_ARGS` when the rule declares parameters.
pub(crate) fn emit_rule_expr(rule: &AstNode, ctx: &EmitContext<'_>, w: &mut CodeWriter) -> Result<(), ContractError> {
    match &rule.kind {
        AstNodeKind::Rule { params: Some(params), body, .. } => {
            w.write("_ARGS(");
            emit_expr(params, ctx, w)?;
            w.write(", _args, ");
            emit_expr(body, ctx, w)?;
            w.write(")");
            Ok(())
        }
        AstNodeKind::Rule { params: None, body, .. } => emit_expr(body, ctx, w),
        _ => Err(ContractError::new(
            format!("expected a Rule node, found {}", rule.kind),
            "metagen.codegen.expr",
        )),
    }
}

pub(crate) fn emit_expr(node: &AstNode, ctx: &EmitContext<'_>, w: &mut CodeWriter) -> Result<(), ContractError> {
    let source = ctx.source();
    match &node.kind {
        AstNodeKind::Literal => {
            let text = node.text(source);
            let literal = text
                .strip_prefix('{')
                .and_then(|t| t.strip_suffix('}'))
                .unwrap_or(text);
            w.write(&format!("_LITERAL({})", literal));
        }
        AstNodeKind::Any => w.write("_ANY()"),
        AstNodeKind::CallOrVar => match ctx.resolution(node)? {
            Resolution::Rule { name, bypass_virtual } => {
                w.write(&format!("_CALL({})", call_target(name, *bypass_virtual)));
            }
            Resolution::Variable { name } => w.write(&format!("_REF({}, this)", name)),
        },
        AstNodeKind::RuleCall { args, .. } => {
            let target = match ctx.resolution(node)? {
                Resolution::Rule { name, bypass_virtual } => call_target(name, *bypass_virtual),
                Resolution::Variable { name } => name.clone(),
            };
            if args.is_empty() {
                w.write(&format!("_CALL({})", target));
            } else {
                let mut items = Vec::with_capacity(args.len());
                for arg in args {
                    let text = arg.text(source).trim();
                    items.push(match ctx.argument(arg)? {
                        ArgumentKind::Rule => format!("new MatchItem({})", text),
                        ArgumentKind::Variable => text.to_string(),
                        ArgumentKind::Value => format!("new MatchItem({}, CONV)", text),
                    });
                }
                w.write(&format!("_CALL({}, new List<MatchItem> {{ {} }})", target, items.join(", ")));
            }
        }
        AstNodeKind::Unary { op, operand } => {
            w.write(op.combinator());
            w.write("(");
            emit_expr(operand, ctx, w)?;
            w.write(")");
        }
        AstNodeKind::Bound { operand, variable } => {
            w.write("_VAR(");
            emit_expr(operand, ctx, w)?;
            w.write(&format!(", {})", variable.text(source).trim()));
        }
        AstNodeKind::Condition { operand, condition } => {
            w.write("_CONDITION(");
            emit_expr(operand, ctx, w)?;

            let text = condition.text(source);
            condition.assign_positions(ctx.lines);
            let (line, column) = ctx.position(condition);
            if uses_match_result(text) {
                w.write(&format!(
                    ", (_IM_Result_MI_) => {{ {} return (\n#line {} \"{}\"\n",
                    default_vars(&ctx.decl().match_item_class),
                    line,
                    ctx.info.input_file_name
                ));
            } else {
                w.write(&format!(
                    ", (_IM_Result_MI_) => {{ return (\n#line {} \"{}\"\n",
                    line, ctx.info.input_file_name
                ));
            }
            w.write(&" ".repeat(column.saturating_sub(1)));
            w.write(text);
            w.write("\n#line default\n);})");
        }
        AstNodeKind::Action { operand, action } => {
            w.write("_ACTION(");
            emit_expr(operand, ctx, w)?;

            let text = action.text(source);
            action.assign_positions(ctx.lines);
            let (line, column) = ctx.position(action);
            if uses_match_result(text) {
                w.write(&format!(
                    ", (_IM_Result_MI_) => {{{{ {} \n#line {} \"{}\"\n",
                    default_vars(&ctx.decl().match_item_class),
                    line,
                    ctx.info.input_file_name
                ));
            } else {
                w.write(&format!(
                    ", (_IM_Result_MI_) => {{{{ \n#line {} \"{}\"\n",
                    line, ctx.info.input_file_name
                ));
            }
            w.write(&" ".repeat(column.saturating_sub(1)));
            w.write(text);
            w.write("\n#line default\n}");
            if !text.contains("return") {
                w.write(&format!(" return default({});", ctx.decl().result_type));
            }
            w.write("})");
        }
        AstNodeKind::Sequence { items } => emit_list("_AND", items, ctx, w)?,
        AstNodeKind::Disjunction { alternatives } => emit_list("_OR", alternatives, ctx, w)?,
        AstNodeKind::Fail { message } => {
            w.write(&format!("_FAIL({})", message.text(source)));
        }
        AstNodeKind::File { .. }
        | AstNodeKind::Using { .. }
        | AstNodeKind::Comment
        | AstNodeKind::Grammar { .. }
        | AstNodeKind::GrammarDecl { .. }
        | AstNodeKind::GenericName { .. }
        | AstNodeKind::Code
        | AstNodeKind::Rule { .. } => {
            return Err(ContractError::new(
                format!("{} node at offset {} cannot appear in an expression", node.kind, node.span.start),
                "metagen.codegen.expr",
            ));
        }
    }
    Ok(())
}

/// A single child is emitted bare; otherwise the children are listed in
/// `combinator(...)`.
fn emit_list(combinator: &str, children: &[AstNode], ctx: &EmitContext<'_>, w: &mut CodeWriter) -> Result<(), ContractError> {
    if let [only] = children {
        return emit_expr(only, ctx, w);
    }

    w.write(combinator);
    w.write("(");
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            w.write(", ");
        }
        emit_expr(child, ctx, w)?;
    }
    w.write(")");
    Ok(())
}
