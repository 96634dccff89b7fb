mod common;

use chrono::{TimeZone, Utc};
use common::{CALC, Cursor, calc_tree, info_for, typed_grammar};
use metagen_core::analyzers::{ArgumentKind, Resolution};
use metagen_core::ast::build as b;
use metagen_core::{
    AstNode, ChoiceMode, GenerateInfo, Level, Span, analyze_semantic_rules, compile_grammar, compile_grammar_into,
    generate_parser, optimize,
};

fn fixed(info: GenerateInfo) -> GenerateInfo {
    info.with_timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
}

fn render(tree: AstNode, source: &str) -> String {
    compile_grammar(tree, &fixed(info_for(source))).expect("generation should succeed")
}

/// One `G<char, int>` grammar holding a single rule `A`, built by `body`.
fn single_rule(source: &str, rule_text: &str, is_override: bool, body: impl FnOnce(&mut Cursor<'_>) -> AstNode) -> AstNode {
    let mut c = Cursor::new(source);
    typed_grammar(&mut c, source, |c| {
        let span = c.find(rule_text);
        let name = b::code(c.find("A"));
        vec![b::rule(span, is_override, name, None, body(c))]
    })
}

#[test]
fn calc_file_prologue() {
    let out = render(calc_tree(), CALC);
    let expected = concat!(
        "// IronMeta Generated Calc.Parsers: 2024-01-02 03:04:05 UTC\n",
        "\n",
        "using System;\n",
        "using System.Collections.Generic;\n",
        "using System.Linq;\n",
        "\n",
        "namespace Calc.Parsers\n",
        "{\n",
        "\n",
        "    public partial class CalcMatcher : IronMeta.Matcher<char, int>\n",
        "    {\n",
        "\n",
        "        /// <summary>Default Constructor.</summary>\n",
        "        public CalcMatcher()\n",
        "            : base(a => default(int), true)\n",
        "        {\n",
        "        }\n",
        "\n",
        "        /// <summary>Constructor.</summary>\n",
        "        public CalcMatcher(Func<char,int> conv, bool strictPEG)\n",
        "            : base(conv, strictPEG)\n",
        "        {\n",
        "        }\n",
        "\n",
        "        /// <summary>Utility class for referencing variables in conditions and actions.</summary>\n",
        "        private class CalcMatcherItem : MatchItem\n",
        "        {\n",
        "            public CalcMatcherItem() : base() { }\n",
        "            public CalcMatcherItem(string name) : base(name) { }\n",
        "            public CalcMatcherItem(MatchItem mi) : base(mi) { }\n",
        "\n",
        "            public static implicit operator int(CalcMatcherItem item) { return item.Results.LastOrDefault(); }\n",
        "            public static implicit operator List<int>(CalcMatcherItem item) { return item.Results.ToList(); }\n",
        "            public static implicit operator char(CalcMatcherItem item) { return item.Inputs.LastOrDefault(); }\n",
        "            public static implicit operator List<char>(CalcMatcherItem item) { return item.Inputs.ToList(); }\n",
        "        }\n",
        "\n",
    );
    assert!(out.starts_with(expected), "unexpected prologue:\n{}", out);
    assert!(out.ends_with("\n    } // class CalcMatcher\n} // namespace Calc.Parsers\n"));
}

#[test]
fn calc_start_rule_is_built_per_call() {
    let out = render(calc_tree(), CALC);
    let expected = format!(
        concat!(
            "        protected virtual IEnumerable<MatchItem> Start(int _indent, IEnumerable<MatchItem> _inputs, int _index, IEnumerable<MatchItem> _args, Memo _memo)\n",
            "        {{\n",
            "            Combinator _Start_Body_ = null;\n",
            "\n",
            "            Combinator _disj_0_ = null;\n",
            "            {{\n",
            "                var foo = new CalcMatcherItem(\"foo\");\n",
            "                _disj_0_ = _ACTION(_AND(_LITERAL(\"x\"), _VAR(_CALL(Digit), foo)), (_IM_Result_MI_) => {{{{ \n",
            "#line 3 \"calc.ironmeta\"\n",
            "{}return foo;\n",
            "#line default\n",
            "}}}});\n",
            "            }}\n",
            "\n",
            "            _Start_Body_ = _disj_0_;\n",
            "\n",
            "            foreach (var _res_ in _Start_Body_.Match(_indent+1, _inputs, _index, null, _memo))\n",
            "            {{\n",
            "                yield return _res_;\n",
            "\n",
            "                if (StrictPEG) yield break;\n",
            "            }}\n",
            "        }}\n",
            "\n",
        ),
        " ".repeat(31)
    );
    assert!(out.contains(&expected), "Start rule not found in:\n{}", out);
    assert!(!out.contains("_Start_Body__Index_"));
}

#[test]
fn calc_digit_rule_is_cached() {
    let out = render(calc_tree(), CALC);
    let expected = concat!(
        "        private int _Digit_Body__Index_ = -1;\n",
        "\n",
        "        protected virtual IEnumerable<MatchItem> Digit(int _indent, IEnumerable<MatchItem> _inputs, int _index, IEnumerable<MatchItem> _args, Memo _memo)\n",
        "        {\n",
        "            Combinator _Digit_Body_ = null;\n",
        "\n",
        "            if (_Digit_Body__Index_ == -1 || CachedCombinators[_Digit_Body__Index_] == null)\n",
        "            {\n",
        "                if (_Digit_Body__Index_ == -1)\n",
        "                {\n",
        "                    _Digit_Body__Index_ = CachedCombinators.Count;\n",
        "                    CachedCombinators.Add(null);\n",
        "                }\n",
        "\n",
        "                Combinator _disj_0_ = null;\n",
        "                {\n",
        "                    _disj_0_ = _LITERAL('0');\n",
        "                }\n",
        "\n",
        "                CachedCombinators[_Digit_Body__Index_] = _disj_0_;\n",
        "            }\n",
        "\n",
        "            _Digit_Body_ = CachedCombinators[_Digit_Body__Index_];\n",
        "\n",
        "\n",
        "            foreach (var _res_ in _Digit_Body_.Match(_indent+1, _inputs, _index, null, _memo))\n",
    );
    assert!(out.contains(expected), "Digit rule not found in:\n{}", out);
}

#[test]
fn rules_are_emitted_in_declaration_order() {
    let out = render(calc_tree(), CALC);
    let start = out.find("IEnumerable<MatchItem> Start(").expect("Start");
    let digit = out.find("IEnumerable<MatchItem> Digit(").expect("Digit");
    assert!(start < digit);
}

#[test]
fn choice_modes_change_the_result_loop() {
    let strict = compile_grammar(calc_tree(), &fixed(info_for(CALC)).with_choice_mode(ChoiceMode::Strict))
        .expect("strict generation");
    assert!(strict.contains("                yield return _res_;\n\n                yield break;\n"));
    assert!(!strict.contains("StrictPEG) yield break"));

    let all = compile_grammar(calc_tree(), &fixed(info_for(CALC)).with_choice_mode(ChoiceMode::AllParses))
        .expect("all-parses generation");
    assert!(all.contains("                yield return _res_;\n            }\n"));
    assert!(!all.contains("yield break"));
}

#[test]
fn missing_namespace_is_a_contract_error_and_writes_nothing() {
    let info = GenerateInfo::new("calc.ironmeta", CALC);
    let mut sink = Vec::new();
    let err = compile_grammar_into(calc_tree(), &info, &mut sink).expect_err("namespace is required");
    assert_eq!(err.level(), Level::Critical);
    assert!(err.message().contains("namespace"));
    assert!(sink.is_empty());
}

#[test]
fn compile_into_writes_the_whole_file() {
    let info = fixed(info_for(CALC));
    let mut sink = Vec::new();
    compile_grammar_into(calc_tree(), &info, &mut sink).expect("generation should succeed");
    let text = String::from_utf8(sink).expect("utf-8 output");
    assert_eq!(text, render(calc_tree(), CALC));
}

#[test]
fn alternatives_fold_left_into_ordered_choice() {
    let source = "grammar G<char, int>\n{\n    A = 'a';\n    A = 'b';\n    A = 'c';\n}\n";
    let mut c = Cursor::new(source);
    let tree = typed_grammar(&mut c, source, |c| {
        ["'a'", "'b'", "'c'"]
            .iter()
            .map(|lit| {
                let span = c.find(&format!("A = {};", lit));
                let name = b::code(c.find("A"));
                b::rule(span, false, name, None, b::literal(c.find(lit)))
            })
            .collect()
    });

    let out = render(tree, source);
    assert!(out.contains("CachedCombinators[_A_Body__Index_] = _OR(_OR(_disj_0_, _disj_1_), _disj_2_);\n"));
    assert!(out.contains("                    _disj_2_ = _LITERAL('c');\n"));
}

#[test]
fn parameters_and_call_arguments() {
    let source = "grammar G<char, int>\n{\n    A p = B(p, C, 42);\n    B = 'b';\n    C = 'c';\n}\n";
    let mut c = Cursor::new(source);
    let tree = typed_grammar(&mut c, source, |c| {
        let span = c.find("A p = B(p, C, 42);");
        let name = b::code(c.find("A"));
        let param = b::call_or_var(c.find("p"));
        let call_span = c.find("B(p, C, 42)");
        let callee = b::code(c.find("B"));
        let args = vec![
            b::call_or_var(c.find("p")),
            b::call_or_var(c.find("C")),
            b::literal(c.find("42")),
        ];
        let a = b::rule(span, false, name, Some(param), b::rule_call(call_span, callee, args));

        let span = c.find("B = 'b';");
        let name = b::code(c.find("B"));
        let b_rule = b::rule(span, false, name, None, b::literal(c.find("'b'")));
        let span = c.find("C = 'c';");
        let name = b::code(c.find("C"));
        let c_rule = b::rule(span, false, name, None, b::literal(c.find("'c'")));
        vec![a, b_rule, c_rule]
    });

    let out = render(tree, source);
    assert!(out.contains("                var p = new GMatcherItem(\"p\");\n"));
    assert!(out.contains(
        "_disj_0_ = _ARGS(_REF(p, this), _args, _CALL(B, new List<MatchItem> { p, new MatchItem(C), new MatchItem(42, CONV) }));\n"
    ));
    assert!(!out.contains("_A_Body__Index_"));
}

#[test]
fn base_calls_bypass_virtual_dispatch() {
    let source = "grammar G<char, int>\n{\n    override A = base.A 'x';\n}\n";
    let tree = single_rule(source, "override A = base.A 'x';", true, |c| {
        let seq = c.find("base.A 'x'");
        let base_ref = b::call_or_var(c.find("base.A"));
        b::sequence(seq, vec![base_ref, b::literal(c.find("'x'"))])
    });

    let out = render(tree, source);
    assert!(out.contains("protected override IEnumerable<MatchItem> A("));
    assert!(out.contains("_disj_0_ = _AND(_CALL(base.A), _LITERAL('x'));\n"));
    assert!(out.contains("private int _A_Body__Index_ = -1;"));
}

#[test]
fn qualified_call_with_arguments_targets_the_base_rule() {
    let source = "grammar G<char, int>\n{\n    A p = base.B(p, B, 7);\n}\n";
    let mut c = Cursor::new(source);
    let mut ids = None;
    let tree = typed_grammar(&mut c, source, |c| {
        let span = c.find("A p = base.B(p, B, 7);");
        let name = b::code(c.find("A"));
        let param = b::call_or_var(c.find("p"));
        let call_span = c.find("base.B(p, B, 7)");
        let callee = b::code(c.find("base.B"));
        let args = vec![
            b::call_or_var(c.find("p")),
            b::call_or_var(c.find("B")),
            b::literal(c.find("7")),
        ];
        let arg_ids: Vec<_> = args.iter().map(|a| a.get_id()).collect();
        let call = b::rule_call(call_span, callee, args);
        ids = Some((call.get_id(), arg_ids));
        vec![b::rule(span, false, name, Some(param), call)]
    });
    let (call_id, arg_ids) = ids.expect("rule built");

    let info = fixed(info_for(source));
    let analysis = analyze_semantic_rules(&tree, &info).expect("analysis should succeed");
    assert!(analysis.is_rule("B"));
    assert_eq!(
        analysis.resolution(call_id),
        Some(&Resolution::Rule { name: "B".to_string(), bypass_virtual: true })
    );
    let kinds: Vec<_> = arg_ids.iter().map(|id| analysis.argument(*id)).collect();
    assert_eq!(
        kinds,
        vec![Some(ArgumentKind::Variable), Some(ArgumentKind::Rule), Some(ArgumentKind::Value)]
    );

    let out = render(tree, source);
    assert!(out.contains(
        "_disj_0_ = _ARGS(_REF(p, this), _args, _CALL(base.B, new List<MatchItem> { p, new MatchItem(B), new MatchItem(7, CONV) }));\n"
    ), "call not found in:\n{}", out);
}

#[test]
fn conditions_without_match_result_skip_the_declarations() {
    let source = "grammar G<char, int>\n{\n    A = 'a' ?(Ready);\n}\n";
    let tree = single_rule(source, "A = 'a' ?(Ready);", false, |c| {
        let span = c.find("'a' ?(Ready)");
        let lit = b::literal(c.find("'a'"));
        let guard = b::code(c.find("Ready"));
        b::condition(span, lit, guard)
    });

    let out = render(tree, source);
    let expected = format!(
        "_disj_0_ = _CONDITION(_LITERAL('a'), (_IM_Result_MI_) => {{ return (\n#line 3 \"calc.ironmeta\"\n{}Ready\n#line default\n);}});\n",
        " ".repeat(14)
    );
    assert!(out.contains(&expected), "condition not found in:\n{}", out);
    assert!(!out.contains("var _IM_Result"));
}

#[test]
fn actions_referencing_match_result_get_the_declarations() {
    let source = "grammar G<char, int>\n{\n    A = 'a' -> { return _IM_Result; };\n}\n";
    let tree = single_rule(source, "A = 'a' -> { return _IM_Result; };", false, |c| {
        let span = c.find("'a' -> { return _IM_Result; }");
        let lit = b::literal(c.find("'a'"));
        let code = b::code(c.find("return _IM_Result;"));
        b::action(span, lit, code)
    });

    let out = render(tree, source);
    let expected = format!(
        "_disj_0_ = _ACTION(_LITERAL('a'), (_IM_Result_MI_) => {{{{ var _IM_Result = new GMatcherItem(_IM_Result_MI_); int _IM_StartIndex = _IM_Result.StartIndex; int _IM_NextIndex = _IM_Result.NextIndex; \n#line 3 \"calc.ironmeta\"\n{}return _IM_Result;\n#line default\n}}}});\n",
        " ".repeat(17)
    );
    assert!(out.contains(&expected), "action not found in:\n{}", out);
    assert!(!out.contains("return default(int)"));
}

#[test]
fn conditions_expose_match_result_when_referenced() {
    let source = "grammar G<char, int>\n{\n    A = 'a' ?(_IM_StartIndex > 0);\n}\n";
    let tree = single_rule(source, "A = 'a' ?(_IM_StartIndex > 0);", false, |c| {
        let span = c.find("'a' ?(_IM_StartIndex > 0)");
        let lit = b::literal(c.find("'a'"));
        let guard = b::code(c.find("_IM_StartIndex > 0"));
        b::condition(span, lit, guard)
    });

    let out = render(tree, source);
    let expected = format!(
        "_disj_0_ = _CONDITION(_LITERAL('a'), (_IM_Result_MI_) => {{ var _IM_Result = new GMatcherItem(_IM_Result_MI_); int _IM_StartIndex = _IM_Result.StartIndex; int _IM_NextIndex = _IM_Result.NextIndex; return (\n#line 3 \"calc.ironmeta\"\n{}_IM_StartIndex > 0\n#line default\n);}});\n",
        " ".repeat(14)
    );
    assert!(out.contains(&expected), "condition not found in:\n{}", out);
}

#[test]
fn actions_without_return_get_a_default_result() {
    let source = "grammar G<char, int>\n{\n    A = 'a' -> { Count++; };\n}\n";
    let tree = single_rule(source, "A = 'a' -> { Count++; };", false, |c| {
        let span = c.find("'a' -> { Count++; }");
        let lit = b::literal(c.find("'a'"));
        let code = b::code(c.find("Count++;"));
        b::action(span, lit, code)
    });

    let out = render(tree, source);
    assert!(out.contains("Count++;\n#line default\n} return default(int);});\n"), "action not found in:\n{}", out);
}

#[test]
fn nested_groups_are_flattened_before_emission() {
    let source = "grammar G<char, int>\n{\n    A = ('a' ('b' 'c')) | ('d' | 'e');\n}\n";
    let tree = single_rule(source, "A = ('a' ('b' 'c')) | ('d' | 'e');", false, |c| {
        let or_span = c.find("('a' ('b' 'c')) | ('d' | 'e')");
        let outer_seq = c.find("'a' ('b' 'c')");
        let a = b::literal(c.find("'a'"));
        let inner_seq = c.find("'b' 'c'");
        let bl = b::literal(c.find("'b'"));
        let cl = b::literal(c.find("'c'"));
        let inner_or = c.find("'d' | 'e'");
        let d = b::literal(c.find("'d'"));
        let e = b::literal(c.find("'e'"));
        b::disjunction(
            or_span,
            vec![
                b::sequence(outer_seq, vec![a, b::sequence(inner_seq, vec![bl, cl])]),
                b::disjunction(inner_or, vec![d, e]),
            ],
        )
    });

    let out = render(tree, source);
    assert!(out.contains(
        "_disj_0_ = _OR(_AND(_LITERAL('a'), _LITERAL('b'), _LITERAL('c')), _LITERAL('d'), _LITERAL('e'));\n"
    ));
}

#[test]
fn unary_any_and_fail() {
    let source = "grammar G<char, int>\n{\n    A = ~. &'a'+ 'b'* 'c'? FAIL(\"oops\");\n}\n";
    let tree = single_rule(source, "A = ~. &'a'+ 'b'* 'c'? FAIL(\"oops\");", false, |c| {
        use metagen_core::UnaryOperator::*;
        let seq = c.find("~. &'a'+ 'b'* 'c'? FAIL(\"oops\")");
        let not = b::unary(seq, NegativeLookahead, b::any(c.find(".")));
        let look_span = c.find("&'a'+");
        let plus = b::unary(look_span, OneOrMore, b::literal(c.find("'a'")));
        let look = b::unary(look_span, Lookahead, plus);
        let star = b::unary(c.find("'b'*"), ZeroOrMore, b::literal(c.find("'b'")));
        let opt = b::unary(c.find("'c'?"), Optional, b::literal(c.find("'c'")));
        let fail = b::fail(c.find("FAIL(\"oops\")"), b::code(c.find("\"oops\"")));
        b::sequence(seq, vec![not, look, star, opt, fail])
    });

    let out = render(tree, source);
    assert!(out.contains(
        "_disj_0_ = _AND(_NOT(_ANY()), _LOOK(_PLUS(_LITERAL('a'))), _STAR(_LITERAL('b')), _QUES(_LITERAL('c')), _FAIL(\"oops\"));\n"
    ));
}

#[test]
fn preamble_is_copied_after_default_imports() {
    let source = "// calculator\nusing System;\ngrammar G<char, int>\n{\n    A = 'a';\n}\n";
    let mut c = Cursor::new(source);
    let whole = c.whole();
    let comment = b::comment(c.find("// calculator"));
    let using_span = c.find("using System;");
    let using = b::using(using_span, b::code(c.find("System")));
    let decl_span = c.find("G<char, int>");
    let name = b::code(c.find("G"));
    let input = b::code(c.find("char"));
    let result = b::code(c.find("int"));
    let decl = b::grammar_decl(decl_span, b::generic_name(decl_span, name, vec![input, result]), None);
    let span = c.find("A = 'a';");
    let rule_name = b::code(c.find("A"));
    let rule = b::rule(span, false, rule_name, None, b::literal(c.find("'a'")));
    let tree = b::file(whole, vec![comment, using], vec![b::grammar(whole, decl, vec![rule])]);

    let out = render(tree, source);
    assert!(out.contains(
        "UTC\n\nusing System.Collections.Generic;\nusing System.Linq;\n// calculator\nusing System;\n\nnamespace Calc.Parsers\n"
    ));
}

#[test]
fn a_tree_that_was_not_analyzed_is_a_contract_error() {
    let info = fixed(info_for(CALC));
    let analysis = analyze_semantic_rules(&calc_tree(), &info).expect("analysis should succeed");
    let other = optimize(calc_tree());
    let err = generate_parser(&other, &analysis, &info).expect_err("ids do not match");
    assert_eq!(err.level(), Level::Critical);
}

#[test]
fn span_helper_sanity() {
    let mut c = Cursor::new(CALC);
    assert_eq!(c.find("grammar"), Span::new(0, 7));
}
