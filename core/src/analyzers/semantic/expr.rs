use super::context::AnalysisContext;
use super::err::SemanticError;
use super::scope::{RawName, RuleScope};
use crate::ast::{AstNode, AstNodeKind};
use crate::error::Level;

/// Qualifiers that delegate to an ancestor grammar's implementation.
const ANCESTOR_QUALIFIERS: [&str; 2] = ["base.", "super."];

/// Splits an identifier into its rule-name role. Ancestor qualifiers are
/// matched case-insensitively and stripped.
pub(crate) fn classify_identifier(text: &str) -> RawName {
    let name = text.trim();
    if !name.contains('.') {
        return RawName::Bare(name.to_string());
    }

    for qualifier in ANCESTOR_QUALIFIERS {
        let prefixed = name
            .get(..qualifier.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(qualifier));
        if prefixed {
            return RawName::Qualified {
                name: name[qualifier.len()..].to_string(),
                bypass_virtual: true,
            };
        }
    }

    RawName::Qualified {
        name: name.to_string(),
        bypass_virtual: false,
    }
}

/// Walks one rule definition and returns the scope of names it uses.
pub(crate) fn analyze_rule(rule: &AstNode, ctx: &mut AnalysisContext<'_>) -> Result<RuleScope, SemanticError> {
    let mut scope = RuleScope::new();
    match &rule.kind {
        AstNodeKind::Rule { params, body, .. } => {
            if let Some(params) = params {
                analyze_expr(params, ctx, &mut scope)?;
            }
            analyze_expr(body, ctx, &mut scope)?;
        }
        _ => return Err(unexpected(rule, ctx, "Expected a Rule node.")),
    }
    Ok(scope)
}

fn analyze_expr(node: &AstNode, ctx: &mut AnalysisContext<'_>, scope: &mut RuleScope) -> Result<(), SemanticError> {
    match &node.kind {
        AstNodeKind::CallOrVar => {
            let raw = classify_identifier(node.text(ctx.source()));
            match &raw {
                RawName::Bare(name) => scope.add_reference(name),
                RawName::Qualified { name, .. } => ctx.add_rule_name(name),
            }
            scope.names.push((node.get_id(), raw));
        }
        AstNodeKind::RuleCall { name, args } => {
            let raw = classify_identifier(name.text(ctx.source()));
            if let RawName::Qualified { name, .. } = &raw {
                ctx.add_rule_name(name);
            }
            scope.callees.push((node.get_id(), raw));

            for arg in args {
                scope
                    .arguments
                    .push((arg.get_id(), arg.text(ctx.source()).trim().to_string()));
                if arg.kind.is_expression() {
                    analyze_expr(arg, ctx, scope)?;
                }
            }
        }
        AstNodeKind::Bound { operand, variable } => {
            scope.add_binding(variable.text(ctx.source()).trim());
            analyze_expr(operand, ctx, scope)?;
        }
        AstNodeKind::Unary { operand, .. }
        | AstNodeKind::Condition { operand, .. }
        | AstNodeKind::Action { operand, .. } => analyze_expr(operand, ctx, scope)?,
        AstNodeKind::Sequence { items } => {
            for item in items {
                analyze_expr(item, ctx, scope)?;
            }
        }
        AstNodeKind::Disjunction { alternatives } => {
            for alternative in alternatives {
                analyze_expr(alternative, ctx, scope)?;
            }
        }
        AstNodeKind::Literal | AstNodeKind::Any | AstNodeKind::Fail { .. } => {}
        AstNodeKind::File { .. }
        | AstNodeKind::Using { .. }
        | AstNodeKind::Comment
        | AstNodeKind::Grammar { .. }
        | AstNodeKind::GrammarDecl { .. }
        | AstNodeKind::GenericName { .. }
        | AstNodeKind::Code
        | AstNodeKind::Rule { .. } => {
            return Err(unexpected(
                node,
                ctx,
                &format!("Unexpected {} node inside a rule body.", node.kind),
            ));
        }
    }
    Ok(())
}

fn unexpected(node: &AstNode, ctx: &AnalysisContext<'_>, message: &str) -> SemanticError {
    SemanticError::with(
        Level::Error,
        message.to_string(),
        "metagen.analyzers.semantic.expr".to_string(),
        Some(ctx.info.location_of(node.span.start)),
        Some(node.span),
    )
}
