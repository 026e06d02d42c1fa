//! 仓库自带示例脚本 `scripts/demo.tscript` 的检查与运行测试

use titanic_runtime::{
    BufferHost, Command, ExitRequested, Interpreter, Script, Value, analyze_script,
    declared_functions,
};

const DEMO: &str = include_str!("../../scripts/demo.tscript");

fn load() -> Script {
    Script::load("demo", DEMO)
}

fn interpreter(answers: &[&str]) -> Interpreter<BufferHost> {
    Interpreter::new(BufferHost::with_answers(answers.iter().copied())).with_globals([
        ("mission", Value::Integer(1)),
        ("phase", Value::Integer(0)),
        ("pennybrush", Value::from("firstEncounter")),
    ])
}

#[test]
fn test_demo_is_clean() {
    let script = load();
    assert!(script.errors.is_empty(), "{:?}", script.errors);

    let diagnostics = analyze_script(&script);
    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(diagnostics.warn_count(), 0);
    assert_eq!(
        declared_functions(&script),
        vec!["runyoself", "firstmeeting", "secondmeeting", "counter"]
    );
}

#[test]
fn test_demo_two_meetings() {
    let script = load();
    let mut interp = interpreter(&["1"]);
    assert_eq!(interp.run_script(&script), Ok(()));
    assert_eq!(interp.global("visits"), Some(&Value::Nil));

    let root = interp.root();
    assert_eq!(
        interp.call_function("runyoself", vec![], root),
        Ok(Value::Nil)
    );
    assert_eq!(interp.global("phase"), Some(&Value::Integer(1)));

    let first = interp.host_mut().take_commands();
    assert_eq!(
        first,
        vec![
            Command::StartTrack {
                track: "deck_theme.ogg".to_string()
            },
            Command::PlayDialogSound {
                sound: "penny_hello.wav".to_string()
            },
            Command::DesignerComment {
                text: "Penny greets the player on the deck".to_string()
            },
            Command::ClearAnswers,
            Command::AddAnswer {
                text: "Who are you?".to_string(),
                id: "1".to_string()
            },
            Command::AddAnswer {
                text: "Goodbye.".to_string(),
                id: "2".to_string()
            },
            Command::PlayDialogSound {
                sound: "penny_intro.wav".to_string()
            },
        ]
    );

    assert_eq!(
        interp.call_function("runyoself", vec![], root),
        Ok(Value::Nil)
    );
    assert_eq!(
        interp.host().commands(),
        &[
            Command::StartTrack {
                track: "deck_theme.ogg".to_string()
            },
            Command::PlayMovie {
                name: "iceberg.bik".to_string()
            },
            Command::Delay {
                amount: "2".to_string()
            },
            Command::DesignerComment {
                text: "nil".to_string()
            },
        ]
    );
    assert!(interp.errors().is_empty());
}

#[test]
fn test_demo_goodbye_exits() {
    let script = load();
    let mut interp = interpreter(&["2"]);
    interp.run_script(&script).unwrap();

    let root = interp.root();
    assert_eq!(
        interp.call_function("runyoself", vec![], root),
        Err(ExitRequested)
    );
    assert_eq!(interp.global("phase"), Some(&Value::Integer(0)));
    assert_eq!(
        interp.host().commands().last(),
        Some(&Command::StopTrack {
            track: "deck_theme.ogg".to_string()
        })
    );
}
