//! Constructors used by grammar front-ends to assemble a tree.

use crate::location::Span;

use super::kind::{AstNodeKind, UnaryOperator};
use super::node::AstNode;

pub fn file(span: Span, preamble: Vec<AstNode>, grammars: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::File { preamble, grammars }, span)
}

pub fn using(span: Span, target: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::Using { target: Box::new(target) }, span)
}

pub fn comment(span: Span) -> AstNode {
    AstNode::new(AstNodeKind::Comment, span)
}

pub fn grammar(span: Span, decl: AstNode, body: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Grammar { decl: Box::new(decl), body }, span)
}

pub fn grammar_decl(span: Span, name: AstNode, base: Option<AstNode>) -> AstNode {
    AstNode::new(
        AstNodeKind::GrammarDecl {
            name: Box::new(name),
            base: base.map(Box::new),
        },
        span,
    )
}

pub fn generic_name(span: Span, name: AstNode, parameters: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::GenericName { name: Box::new(name), parameters }, span)
}

pub fn code(span: Span) -> AstNode {
    AstNode::new(AstNodeKind::Code, span)
}

pub fn rule(span: Span, is_override: bool, name: AstNode, params: Option<AstNode>, body: AstNode) -> AstNode {
    AstNode::new(
        AstNodeKind::Rule {
            is_override,
            name: Box::new(name),
            params: params.map(Box::new),
            body: Box::new(body),
        },
        span,
    )
}

pub fn literal(span: Span) -> AstNode {
    AstNode::new(AstNodeKind::Literal, span)
}

pub fn call_or_var(span: Span) -> AstNode {
    AstNode::new(AstNodeKind::CallOrVar, span)
}

pub fn rule_call(span: Span, name: AstNode, args: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::RuleCall { name: Box::new(name), args }, span)
}

pub fn any(span: Span) -> AstNode {
    AstNode::new(AstNodeKind::Any, span)
}

pub fn unary(span: Span, op: UnaryOperator, operand: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::Unary { op, operand: Box::new(operand) }, span)
}

pub fn bound(span: Span, operand: AstNode, variable: AstNode) -> AstNode {
    AstNode::new(
        AstNodeKind::Bound {
            operand: Box::new(operand),
            variable: Box::new(variable),
        },
        span,
    )
}

pub fn condition(span: Span, operand: AstNode, condition: AstNode) -> AstNode {
    AstNode::new(
        AstNodeKind::Condition {
            operand: Box::new(operand),
            condition: Box::new(condition),
        },
        span,
    )
}

pub fn action(span: Span, operand: AstNode, action: AstNode) -> AstNode {
    AstNode::new(
        AstNodeKind::Action {
            operand: Box::new(operand),
            action: Box::new(action),
        },
        span,
    )
}

pub fn sequence(span: Span, items: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Sequence { items }, span)
}

pub fn disjunction(span: Span, alternatives: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Disjunction { alternatives }, span)
}

pub fn fail(span: Span, message: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::Fail { message: Box::new(message) }, span)
}
