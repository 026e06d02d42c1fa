//! # 控制台会话集成测试
//!
//! 测试 Script → Interpreter → Session → ConsoleHost 的完整链路。
//! 输入输出都是内存缓冲区，不依赖真实终端。

use std::io::Cursor;

use titanic_cli::{ConsoleHost, Session, SessionOptions};
use titanic_runtime::{Interpreter, Script, Value};

type TestInterpreter = Interpreter<ConsoleHost<Cursor<Vec<u8>>, Vec<u8>>>;

const PROMPT: &str = "Enter a function to execute or enter 'exit': \n";

fn interpreter(input: &str) -> TestInterpreter {
    let host = ConsoleHost::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    Interpreter::new(host).with_globals([
        ("mission", Value::Integer(1)),
        ("phase", Value::Integer(0)),
        ("pennybrush", Value::from("firstEncounter")),
    ])
}

/// 运行会话，返回 (stdout, 错误通道)
fn run(interp: &mut TestInterpreter, source: &str, options: &SessionOptions) -> (String, String) {
    let script = Script::load("test", source);
    let mut diagnostics = Vec::new();
    Session::new(interp, options, &mut diagnostics)
        .run(&script)
        .unwrap();

    let stdout = String::from_utf8(interp.host().output().clone()).unwrap();
    (stdout, String::from_utf8(diagnostics).unwrap())
}

#[test]
fn test_repl_calls_until_exit() {
    let source = r#"
code greet(name)
message(name)
endcode
code leave()
message("bye")
exitcode
message("never")
endcode
"#;
    let mut interp = interpreter("greet Rose\nleave\nfrobnicate 1\nEXIT\ngreet ignored\n");
    let (stdout, diagnostics) = run(&mut interp, source, &SessionOptions::default());

    let expected = [
        "\n=== LAUNCHING THE INTERPRETER... ===\n\n",
        "\n=== BEGINNING OF THE GAME ===\n\n",
        PROMPT,
        "\nLevel designer comment: 'Rose'.\n",
        PROMPT,
        "\nLevel designer comment: 'bye'.\n",
        "\nFunction ended\n",
        PROMPT,
        "\n",
        PROMPT,
        "\n=== EXITING... ===\n\n",
    ]
    .concat();
    assert_eq!(stdout, expected);
    assert_eq!(diagnostics, "Unknown function: frobnicate\n");
}

#[test]
fn test_puppetevent_reads_from_same_input() {
    let source = r#"
code ask()
puppetclear()
puppetbevel("Yes", 1)
answer = puppetevent()
if answer = 1
message("chose yes")
else
message("chose no")
endif
endcode
"#;
    let mut interp = interpreter("ask\n 1 \nexit\n");
    let (stdout, diagnostics) = run(&mut interp, source, &SessionOptions::default());

    assert!(stdout.contains("Hide answers to the character you are talking to.\n"));
    assert!(stdout.contains("Add answer option (id '1'): 'Yes'.\n"));
    assert!(stdout.contains("Enter the answer id: Level designer comment: 'chose yes'.\n"));
    assert!(!stdout.contains("chose no"));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_non_interactive_calls() {
    let source = r#"
code setup()
advancephase()
endcode
code intro()
message(phase)
endcode
"#;
    let options = SessionOptions {
        entry_function: Some("setup".to_string()),
        calls: vec!["intro".to_string(), "intro".to_string()],
        interactive: false,
        ..SessionOptions::default()
    };
    let mut interp = interpreter("");
    let (stdout, diagnostics) = run(&mut interp, source, &options);

    assert_eq!(
        stdout,
        "\n=== LAUNCHING THE INTERPRETER... ===\n\n\
         Level designer comment: '1'.\n\
         Level designer comment: '1'.\n"
    );
    assert!(diagnostics.is_empty());
    assert_eq!(interp.global("phase"), Some(&Value::Integer(1)));
}

#[test]
fn test_top_level_exitcode() {
    let source = "message(\"top\")\nexitcode\nmessage(\"after\")";
    let options = SessionOptions {
        interactive: false,
        ..SessionOptions::default()
    };
    let mut interp = interpreter("");
    let (stdout, _) = run(&mut interp, source, &options);

    assert_eq!(
        stdout,
        "\n=== LAUNCHING THE INTERPRETER... ===\n\n\
         Level designer comment: 'top'.\n\
         \n\
         Function ended\n"
    );
}

#[test]
fn test_end_of_input_leaves_repl() {
    let mut interp = interpreter("\n   \n");
    let (stdout, diagnostics) = run(&mut interp, "", &SessionOptions::default());

    assert_eq!(stdout.matches(PROMPT).count(), 3);
    assert!(!stdout.contains("EXITING"));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_custom_exit_command() {
    let options = SessionOptions {
        exit_command: "quit".to_string(),
        ..SessionOptions::default()
    };
    let mut interp = interpreter("exit\nQUIT\n");
    let (stdout, diagnostics) = run(&mut interp, "", &options);

    assert!(stdout.contains("Enter a function to execute or enter 'quit': \n"));
    assert!(stdout.ends_with("\n=== EXITING... ===\n\n"));
    assert_eq!(diagnostics, "Unknown function: exit\n");
}
