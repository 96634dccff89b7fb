use log::{debug, warn};

use super::context::AnalysisContext;
use super::err::SemanticError;
use super::expr;
use super::table::{Alternative, RuleTable};
use crate::analyzers::output::{DEFAULT_MATCHER_BASE, GrammarDecl};
use crate::ast::{AstNode, AstNodeKind, NodeId};
use crate::error::Level;

/// Host imports every generated file relies on.
const REQUIRED_IMPORTS: [&str; 3] = ["System", "System.Collections.Generic", "System.Linq"];

/// A grammar whose rules have been walked but not yet classified.
pub(crate) struct PendingGrammar {
    pub node_id: NodeId,
    pub decl: GrammarDecl,
    pub rules: RuleTable,
}

/// `using` directives to add because the preamble does not already import them.
pub(crate) fn default_imports(preamble: &[AstNode], source: &str) -> Vec<String> {
    let imported: Vec<&str> = preamble
        .iter()
        .filter_map(|node| match &node.kind {
            AstNodeKind::Using { target } => Some(target.text(source).trim()),
            _ => None,
        })
        .collect();

    REQUIRED_IMPORTS
        .iter()
        .filter(|required| !imported.contains(*required))
        .map(|required| format!("using {};", required))
        .collect()
}

pub(crate) fn analyze_grammar(
    node: &AstNode,
    ctx: &mut AnalysisContext<'_>,
) -> Result<PendingGrammar, SemanticError> {
    let (decl_node, body) = match &node.kind {
        AstNodeKind::Grammar { decl, body } => (decl.as_ref(), body),
        _ => return Err(error_at(node, ctx, format!("Expected a Grammar node, found {}.", node.kind))),
    };

    let decl = analyze_declaration(decl_node, ctx)?;

    let mut rules = Vec::new();
    for item in body {
        collect_rules(item, &mut rules);
    }

    // every name is registered before any body is walked
    let named: Vec<(&AstNode, &str, bool)> = rules
        .into_iter()
        .map(|(rule, name, is_override)| (rule, name.text(ctx.source()).trim(), is_override))
        .collect();
    for (_, name, _) in &named {
        ctx.add_rule_name(name);
    }

    let mut table = RuleTable::new();
    for (rule, name, is_override) in named {
        let scope = expr::analyze_rule(rule, ctx)?;
        table.add_alternative(
            name,
            Alternative {
                rule_id: rule.get_id(),
                is_override,
                scope,
            },
        );
    }

    if table.is_empty() {
        warn!("grammar `{}` defines no rules; its class will have no matcher functions", decl.class_name);
    }
    debug!(
        "grammar `{}`: {} rule name(s), {} definition(s)",
        decl.class_name,
        table.len(),
        table.iter().map(|set| set.alternatives().len()).sum::<usize>()
    );

    Ok(PendingGrammar {
        node_id: node.get_id(),
        decl,
        rules: table,
    })
}

fn collect_rules<'n>(node: &'n AstNode, out: &mut Vec<(&'n AstNode, &'n AstNode, bool)>) {
    if let AstNodeKind::Rule { is_override, name, .. } = &node.kind {
        out.push((node, name.as_ref(), *is_override));
    } else {
        for child in node.children() {
            collect_rules(child, out);
        }
    }
}

fn analyze_declaration(node: &AstNode, ctx: &AnalysisContext<'_>) -> Result<GrammarDecl, SemanticError> {
    let source = ctx.source();
    let (name_node, base) = match &node.kind {
        AstNodeKind::GrammarDecl { name, base } => (name.as_ref(), base.as_deref()),
        _ => return Err(error_at(node, ctx, format!("Expected a GrammarDecl node, found {}.", node.kind))),
    };

    let (name, own_types) = split_generic(name_node, source);
    let types = match own_types {
        Some(types) => Some(types),
        None => base.and_then(|b| split_generic(b, source).1),
    };

    let Some((input_type, result_type)) = types else {
        return Err(error_at(
            node,
            ctx,
            format!(
                "{}: a grammar declaration must include input and result types (directly or through an explicit generic base).",
                name
            ),
        ));
    };

    let class_name = format!("{}Matcher", name);
    let base_class = match base {
        Some(b) => b.text(source).trim().to_string(),
        None => format!("{}<{}, {}>", DEFAULT_MATCHER_BASE, input_type, result_type),
    };

    Ok(GrammarDecl {
        match_item_class: format!("{}Item", class_name),
        name,
        class_name,
        input_type,
        result_type,
        base_class,
    })
}

/// Name and, when exactly two generic parameters are given, the
/// `(input, result)` type pair.
fn split_generic(node: &AstNode, source: &str) -> (String, Option<(String, String)>) {
    match &node.kind {
        AstNodeKind::GenericName { name, parameters } => {
            let types = match parameters.as_slice() {
                [input, result] => Some((
                    input.text(source).trim().to_string(),
                    result.text(source).trim().to_string(),
                )),
                _ => None,
            };
            (name.text(source).trim().to_string(), types)
        }
        _ => (node.text(source).trim().to_string(), None),
    }
}

fn error_at(node: &AstNode, ctx: &AnalysisContext<'_>, message: String) -> SemanticError {
    SemanticError::with(
        Level::Error,
        message,
        "metagen.analyzers.semantic.decl".to_string(),
        Some(ctx.info.location_of(node.span.start)),
        Some(node.span),
    )
}
