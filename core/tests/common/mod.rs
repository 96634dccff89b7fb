#![allow(dead_code)]

use metagen_core::ast::{AstNode, build as b};
use metagen_core::{GenerateInfo, Span};

/// Finds spans in a grammar source in preorder: each lookup starts at the
/// previous match's start, so a parent is located before its children.
pub struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Cursor { source, pos: 0 }
    }

    pub fn whole(&self) -> Span {
        Span::new(0, self.source.len())
    }

    pub fn find(&mut self, needle: &str) -> Span {
        let offset = self.source[self.pos..]
            .find(needle)
            .unwrap_or_else(|| panic!("`{}` not found after offset {}", needle, self.pos));
        let start = self.pos + offset;
        self.pos = start;
        Span::new(start, start + needle.len())
    }

    /// Like `find`, but moves past the match.
    pub fn skip(&mut self, needle: &str) -> Span {
        let span = self.find(needle);
        self.pos = span.next;
        span
    }
}

pub const CALC_FILE: &str = "calc.ironmeta";

pub const CALC: &str = "grammar Calc<char, int>\n{\n    Start = \"x\" foo:Digit -> { return foo; };\n    Digit = '0';\n}\n";

/// `Start = "x" foo:Digit -> { return foo; };` followed by `Digit = '0';`.
pub fn calc_tree() -> AstNode {
    let mut c = Cursor::new(CALC);
    let whole = c.whole();
    let grammar_span = Span::new(c.find("grammar Calc").start, CALC.trim_end().len());
    let decl_span = c.find("Calc<char, int>");
    let name = b::code(c.find("Calc"));
    let input = b::code(c.find("char"));
    let result = b::code(c.find("int"));
    let decl = b::grammar_decl(decl_span, b::generic_name(decl_span, name, vec![input, result]), None);

    let start_span = c.find("Start = \"x\" foo:Digit -> { return foo; };");
    let start_name = b::code(c.find("Start"));
    let action_span = c.find("\"x\" foo:Digit -> { return foo; }");
    let seq_span = c.find("\"x\" foo:Digit");
    let lit = b::literal(c.find("\"x\""));
    let bound_span = c.find("foo:Digit");
    let var = b::code(c.find("foo"));
    let digit_ref = b::call_or_var(c.find("Digit"));
    let code = b::code(c.find("return foo;"));
    let start = b::rule(
        start_span,
        false,
        start_name,
        None,
        b::action(action_span, b::sequence(seq_span, vec![lit, b::bound(bound_span, digit_ref, var)]), code),
    );

    let digit_span = c.find("Digit = '0';");
    let digit_name = b::code(c.find("Digit"));
    let zero = b::literal(c.find("'0'"));
    let digit = b::rule(digit_span, false, digit_name, None, zero);

    b::file(whole, vec![], vec![b::grammar(grammar_span, decl, vec![start, digit])])
}

pub fn info_for(source: &str) -> GenerateInfo {
    GenerateInfo::new(CALC_FILE, source).with_namespace("Calc.Parsers")
}

/// `grammar G<char, int>` whose rules `rules` builds from the same cursor.
pub fn typed_grammar(
    c: &mut Cursor<'_>,
    source: &str,
    rules: impl FnOnce(&mut Cursor<'_>) -> Vec<AstNode>,
) -> AstNode {
    let whole = c.whole();
    let decl_span = c.find("G<char, int>");
    let name = b::code(c.find("G"));
    let input = b::code(c.find("char"));
    let result = b::code(c.find("int"));
    let decl = b::grammar_decl(decl_span, b::generic_name(decl_span, name, vec![input, result]), None);
    let body = rules(c);
    b::file(whole, vec![], vec![b::grammar(Span::new(0, source.len()), decl, body)])
}
