//! # Driver 模块
//!
//! 控制台会话：执行一次顶层语句，再循环读取 `函数名 参数 参数...`
//! 并调用 [`Interpreter::call_function`]。
//!
//! ```text
//! run_script                 注册函数、初始化全局变量
//! entry_function / --call    非交互调用，按顺序执行
//! 交互循环                    读一行 → 拆词 → 调用，直到退出命令或输入结束
//! ```
//!
//! `exitcode` 只结束当前这一次调用，会话继续。

use std::io::{self, BufRead, Write};

use titanic_runtime::{ExitRequested, Interpreter, Script, Value};
use tracing::{debug, info};

use crate::console::ConsoleHost;

/// 会话选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// 退出命令（大小写不敏感）
    pub exit_command: String,
    /// 加载后立即调用的函数
    pub entry_function: Option<String>,
    /// 非交互调用列表
    pub calls: Vec<String>,
    /// 是否进入交互循环
    pub interactive: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            exit_command: "exit".to_string(),
            entry_function: None,
            calls: Vec::new(),
            interactive: true,
        }
    }
}

/// 一行交互输入的含义
#[derive(Debug, Clone, PartialEq)]
pub enum ReplInput<'a> {
    /// 退出命令
    Exit,
    /// 空行
    Empty,
    /// 函数调用
    Call { name: &'a str, args: Vec<Value> },
}

/// 解析一行交互输入
///
/// 按空白拆词，第一个词是函数名，其余是实参。
pub fn parse_command_line<'a>(line: &'a str, exit_command: &str) -> ReplInput<'a> {
    let line = line.trim();
    if line.eq_ignore_ascii_case(exit_command.trim()) {
        return ReplInput::Exit;
    }

    let mut words = line.split_whitespace();
    match words.next() {
        None => ReplInput::Empty,
        Some(name) => ReplInput::Call {
            name,
            args: words.map(parse_argument).collect(),
        },
    }
}

/// 把一个命令行单词转换为脚本值
///
/// 能解析为 i64 的是 `Integer`，`true` / `false`（大小写不敏感）是 `Bool`，
/// 其余原样作为 `Str`。
pub fn parse_argument(word: &str) -> Value {
    if let Ok(n) = word.parse::<i64>() {
        return Value::Integer(n);
    }
    if word.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if word.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::from(word)
}

/// 日志过滤器优先级：`--log` > `RUST_LOG` > 配置文件 > `warn`
pub fn resolve_log_filter(cli: Option<&str>, env: Option<String>, config: &str) -> String {
    cli.map(str::to_string)
        .or(env)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| (!config.trim().is_empty()).then(|| config.to_string()))
        .unwrap_or_else(|| "warn".to_string())
}

/// 把解析错误逐行写入错误通道，返回错误数量
pub fn report_parse_errors(script: &Script, sink: &mut impl Write) -> io::Result<usize> {
    for error in &script.errors {
        writeln!(sink, "{error}")?;
    }
    Ok(script.errors.len())
}

/// 控制台会话
pub struct Session<'a, R, W, E> {
    interpreter: &'a mut Interpreter<ConsoleHost<R, W>>,
    diagnostics: E,
    options: &'a SessionOptions,
}

impl<'a, R: BufRead, W: Write, E: Write> Session<'a, R, W, E> {
    /// `diagnostics` 接收运行时错误，每条一行
    pub fn new(
        interpreter: &'a mut Interpreter<ConsoleHost<R, W>>,
        options: &'a SessionOptions,
        diagnostics: E,
    ) -> Self {
        Self {
            interpreter,
            diagnostics,
            options,
        }
    }

    /// 运行完整会话
    pub fn run(&mut self, script: &Script) -> io::Result<()> {
        self.console().title("LAUNCHING THE INTERPRETER...")?;
        let outcome = self.interpreter.run_script(script);
        self.finish_call(outcome.map(|()| Value::NoValue))?;

        if let Some(entry) = self.options.entry_function.clone() {
            self.invoke(&entry, Vec::new())?;
        }
        for name in self.options.calls.clone() {
            self.invoke(&name, Vec::new())?;
        }

        if self.options.interactive {
            self.repl()?;
        }
        Ok(())
    }

    /// 交互循环
    fn repl(&mut self) -> io::Result<()> {
        self.console().title("BEGINNING OF THE GAME")?;
        let prompt = format!(
            "Enter a function to execute or enter '{}': ",
            self.options.exit_command
        );

        loop {
            self.console().message(&prompt)?;
            let Some(line) = self.console().read_line()? else {
                debug!("输入结束，退出交互循环");
                return Ok(());
            };

            match parse_command_line(&line, &self.options.exit_command) {
                ReplInput::Exit => {
                    self.console().title("EXITING...")?;
                    return Ok(());
                }
                ReplInput::Empty => continue,
                ReplInput::Call { name, args } => {
                    self.console().new_line()?;
                    self.invoke(name, args)?;
                }
            }
        }
    }

    /// 在根作用域调用一次函数
    pub fn invoke(&mut self, name: &str, args: Vec<Value>) -> io::Result<()> {
        info!(function = name, args = args.len(), "宿主调用函数");
        let root = self.interpreter.root();
        let outcome = self.interpreter.call_function(name, args, root);
        self.finish_call(outcome)
    }

    /// 消费一次顶层调用的结果，输出期间积累的运行时错误
    fn finish_call(&mut self, outcome: Result<Value, ExitRequested>) -> io::Result<()> {
        for error in self.interpreter.take_errors() {
            writeln!(self.diagnostics, "{error}")?;
        }

        match outcome {
            Ok(value) => {
                debug!(result = %value, "调用结束");
                Ok(())
            }
            Err(ExitRequested) => {
                debug!("exitcode 结束了当前调用");
                self.console().new_line()?;
                self.console().message("Function ended")
            }
        }
    }

    fn console(&mut self) -> &mut ConsoleHost<R, W> {
        self.interpreter.host_mut()
    }
}
