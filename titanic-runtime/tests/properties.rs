//! 基于 proptest 的性质测试
//!
//! - 词法往返：字面量内容（标识符、数字、字符串）原样出现在 token 中
//! - 解析幂等：同一 token 序列解析两次得到相同结果
//! - switch 只执行第一个匹配的 case

use proptest::prelude::*;
use titanic_runtime::{
    BufferHost, Command, Interpreter, Parser, Script, TokenKind, Value, tokenize,
};

// ============================================================================
// 生成策略
// ============================================================================

/// 不与关键字 / 布尔值冲突的标识符
fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}".prop_filter("reserved word", |s| {
        !titanic_runtime::script::token::is_keyword(s) && s != "true" && s != "false"
    })
}

fn arb_number() -> impl Strategy<Value = String> {
    "[0-9]{1,9}"
}

/// 字符串内容：不含引号，也不含 `/`（`//` 会被当作注释截断）
fn arb_string_content() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,()=.!?]{0,16}"
}

#[derive(Debug, Clone)]
enum Literal {
    Ident(String),
    Number(String),
    Str(String),
}

impl Literal {
    fn source(&self) -> String {
        match self {
            Self::Ident(s) | Self::Number(s) => s.clone(),
            Self::Str(s) => format!("\"{}\"", s),
        }
    }

    fn content(&self) -> &str {
        match self {
            Self::Ident(s) | Self::Number(s) | Self::Str(s) => s,
        }
    }
}

fn arb_literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        arb_ident().prop_map(Literal::Ident),
        arb_number().prop_map(Literal::Number),
        arb_string_content().prop_map(Literal::Str),
    ]
}

/// 一行调用语句：`name(arg, ...)`，外加随机空白与尾注释
fn arb_call_line() -> impl Strategy<Value = (String, Vec<Literal>, String)> {
    (
        arb_ident(),
        prop::collection::vec(arb_literal(), 0..5),
        "[ \t]{0,3}",
        prop::option::of("[a-z ]{0,10}"),
    )
        .prop_map(|(name, args, pad, comment)| {
            let rendered: Vec<String> = args.iter().map(Literal::source).collect();
            let mut line = format!("{pad}{name}({}){pad}", rendered.join(format!(",{pad}").as_str()));
            if let Some(comment) = comment {
                line.push_str(" // ");
                line.push_str(&comment);
            }
            (name, args, line)
        })
}

/// 语法片段，可能拼出不完整的块结构
fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_ident().prop_map(|n| format!("{n} = 1")),
        arb_ident().prop_map(|n| format!("{n}(\"x\", 2)")),
        arb_ident().prop_map(|n| format!("code {n}(a, b)")),
        Just("endcode".to_string()),
        Just("if mission = 1".to_string()),
        Just("else".to_string()),
        Just("endif".to_string()),
        Just("while phase = 0".to_string()),
        Just("endwhile".to_string()),
        Just("switch phase".to_string()),
        Just("case 1".to_string()),
        Just("endswitch".to_string()),
        Just("global a, b".to_string()),
        Just("local c".to_string()),
        Just("return a".to_string()),
        Just("exitcode".to_string()),
        Just("message(\"oops".to_string()),
        Just(") = ,".to_string()),
        Just("// comment".to_string()),
        Just(String::new()),
    ]
}

fn arb_source() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..24).prop_map(|lines| lines.join("\n"))
}

// ============================================================================
// 性质
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn lexer_preserves_literal_content(lines in prop::collection::vec(arb_call_line(), 1..6)) {
        let source: Vec<&str> = lines.iter().map(|(_, _, line)| line.as_str()).collect();
        let tokens = tokenize(&source.join("\n"));

        let expected: Vec<&str> = lines
            .iter()
            .flat_map(|(name, args, _)| {
                std::iter::once(name.as_str()).chain(args.iter().map(Literal::content))
            })
            .collect();
        let actual: Vec<&str> = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Symbol | TokenKind::Eof))
            .map(|t| t.text.as_str())
            .collect();

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn well_formed_call_lines_parse_cleanly(lines in prop::collection::vec(arb_call_line(), 1..6)) {
        let source: Vec<&str> = lines.iter().map(|(_, _, line)| line.as_str()).collect();
        let script = Script::load("prop", &source.join("\n"));
        prop_assert!(script.errors.is_empty(), "{:?}", script.errors);
        prop_assert_eq!(script.statements.len(), lines.len());
    }

    #[test]
    fn reparsing_is_idempotent(source in arb_source()) {
        let tokens = tokenize(&source);

        let mut parser = Parser::new(&tokens);
        let first = parser.parse();
        let first_errors = parser.take_errors();
        let second = parser.parse();
        let second_errors = parser.take_errors();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first_errors, second_errors);
        prop_assert_eq!(first, Parser::new(&tokens).parse());
    }

    #[test]
    fn switch_runs_first_matching_case(selector in 0i64..4, cases in prop::collection::vec(0i64..4, 0..6)) {
        let mut source = format!("switch {selector}\n");
        for (index, value) in cases.iter().enumerate() {
            source.push_str(&format!("case {value}\nmessage(\"{index}\")\n"));
        }
        source.push_str("endswitch");

        let script = Script::load("prop", &source);
        let mut interp = Interpreter::new(BufferHost::new());
        prop_assert_eq!(interp.run_script(&script), Ok(()));

        let expected: Vec<Command> = cases
            .iter()
            .position(|value| *value == selector)
            .map(|index| Command::DesignerComment { text: index.to_string() })
            .into_iter()
            .collect();
        prop_assert_eq!(interp.host().commands(), expected.as_slice());
    }

    #[test]
    fn false_if_has_no_side_effects(body in prop::collection::vec(arb_ident(), 0..6)) {
        let mut source = String::from("if mission = 2\n");
        for name in &body {
            source.push_str(&format!("{name} = 1\nmessage(\"{name}\")\nadvancephase()\n"));
        }
        source.push_str("endif");

        let script = Script::load("prop", &source);
        let mut interp = Interpreter::new(BufferHost::new())
            .with_globals([("mission", Value::Integer(1)), ("phase", Value::Integer(0))]);
        prop_assert_eq!(interp.run_script(&script), Ok(()));

        prop_assert!(interp.host().commands().is_empty());
        prop_assert_eq!(interp.scopes().globals().len(), 2);
        prop_assert_eq!(interp.global("phase"), Some(&Value::Integer(0)));
    }
}
