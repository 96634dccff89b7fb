use std::collections::HashMap;

use log::debug;

use super::context::EmitContext;
use super::expr;
use super::writer::CodeWriter;
use crate::analyzers::semantic::AlternativeSet;
use crate::ast::{AstNode, NodeId};
use crate::error::ContractError;
use crate::info::ChoiceMode;

/// Emits the matcher function for one alternative set at `indent`.
pub(crate) fn emit_rule_set(
    set: &AlternativeSet,
    rules: &HashMap<NodeId, &AstNode>,
    ctx: &EmitContext<'_>,
    w: &mut CodeWriter,
    indent: usize,
) -> Result<(), ContractError> {
    let name = set.name();
    let cached = set.is_cacheable();
    let body = format!("_{}_Body_", name);
    let index = format!("{}_Index_", body);

    if cached {
        w.indented(indent, &format!("private int {} = -1;\n\n", index));
    }

    w.indented(
        indent,
        &format!(
            "protected {} IEnumerable<MatchItem> {}(int _indent, IEnumerable<MatchItem> _inputs, int _index, IEnumerable<MatchItem> _args, Memo _memo)\n",
            if set.is_override() { "override" } else { "virtual" },
            name
        ),
    );
    w.indented(indent, "{\n");
    w.indented(indent + 1, &format!("Combinator {} = null;\n\n", body));

    let base = if cached {
        w.indented(indent + 1, &format!("if ({0} == -1 || CachedCombinators[{0}] == null)\n", index));
        w.indented(indent + 1, "{\n");
        w.indented(indent + 2, &format!("if ({} == -1)\n", index));
        w.indented(indent + 2, "{\n");
        w.indented(indent + 3, &format!("{} = CachedCombinators.Count;\n", index));
        w.indented(indent + 3, "CachedCombinators.Add(null);\n");
        w.indented(indent + 2, "}\n\n");
        indent + 1
    } else {
        indent
    };

    let mut disjuncts = Vec::with_capacity(set.alternatives().len());
    for (n, alternative) in set.alternatives().iter().enumerate() {
        let disj = format!("_disj_{}_", n);
        let rule = rules.get(&alternative.rule_id).ok_or_else(|| {
            ContractError::new(
                format!("definition #{} of rule `{}` is missing from the grammar tree", n, name),
                "metagen.codegen.rule",
            )
        })?;

        w.indented(base + 1, &format!("Combinator {} = null;\n", disj));
        w.indented(base + 1, "{\n");
        for slot in alternative.scope.slots() {
            w.indented(base + 2, &format!("var {0} = new {1}(\"{0}\");\n", slot, ctx.decl().match_item_class));
        }

        w.indented(base + 2, &format!("{} = ", disj));
        expr::emit_rule_expr(rule, ctx, w)?;
        w.write(";\n");
        w.indented(base + 1, "}\n");

        disjuncts.push(disj);
    }
    w.newline();

    let top = disjuncts
        .into_iter()
        .reduce(|acc, disj| format!("_OR({}, {})", acc, disj))
        .ok_or_else(|| {
            ContractError::new(format!("rule `{}` has no definitions", name), "metagen.codegen.rule")
        })?;

    if cached {
        w.indented(indent + 2, &format!("CachedCombinators[{}] = {};\n", index, top));
        w.indented(indent + 1, "}\n\n");
        w.indented(indent + 1, &format!("{0} = CachedCombinators[{1}];\n\n", body, index));
    } else {
        w.indented(indent + 1, &format!("{} = {};\n", body, top));
    }
    w.newline();

    w.indented(
        indent + 1,
        &format!("foreach (var _res_ in {}.Match(_indent+1, _inputs, _index, null, _memo))\n", body),
    );
    w.indented(indent + 1, "{\n");
    match ctx.info.choice_mode {
        ChoiceMode::Runtime => {
            w.indented(indent + 2, "yield return _res_;\n\n");
            w.indented(indent + 2, "if (StrictPEG) yield break;\n");
        }
        ChoiceMode::Strict => {
            w.indented(indent + 2, "yield return _res_;\n\n");
            w.indented(indent + 2, "yield break;\n");
        }
        ChoiceMode::AllParses => w.indented(indent + 2, "yield return _res_;\n"),
    }
    w.indented(indent + 1, "}\n");
    w.indented(indent, "}\n\n");

    debug!(
        "emitted {}.{} ({} alternative(s), {})",
        ctx.decl().class_name,
        name,
        set.alternatives().len(),
        if cached { "cached" } else { "per call" }
    );
    Ok(())
}
