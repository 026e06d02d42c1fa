//! # Titanic Runtime
//!
//! 对话 / 游戏事件脚本语言的核心运行时库。
//!
//! ## 架构概述
//!
//! `titanic-runtime` 是纯逻辑核心，不直接访问标准输入输出或文件系统。
//! 它通过 **Host 边界** 与外界通信：
//!
//! ```text
//! 源文本 → Lexer → Vec<Token> → Parser → Vec<Stmt>
//!                                           │
//!                                           ▼
//! Host ◄──── Command / read_answer ──── Interpreter ◄── call_function(name, args)
//! ```
//!
//! ## 核心类型
//!
//! - [`Script`]：加载后的脚本（语句 + 解析错误）
//! - [`Interpreter`]：树遍历解释器
//! - [`Value`]：运行时动态值
//! - [`Command`]：解释器向 Host 发出的指令
//! - [`Host`]：展示输出与行输入能力
//!
//! ## 使用示例
//!
//! ```ignore
//! use titanic_runtime::{BufferHost, Interpreter, Script, Value};
//!
//! let script = Script::load("main", source);
//! for error in &script.errors {
//!     eprintln!("{error}");
//! }
//!
//! let mut interpreter = Interpreter::new(BufferHost::new())
//!     .with_globals([("mission", Value::Integer(1)), ("phase", Value::Integer(0))]);
//!
//! // 顶层语句执行一次，注册函数
//! let _ = interpreter.run_script(&script);
//!
//! // 宿主反复调用函数入口
//! let root = interpreter.root();
//! match interpreter.call_function("greet", vec![Value::from("Rose")], root) {
//!     Ok(value) => println!("{value}"),
//!     Err(ExitRequested) => println!("Function ended"),
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`script`]：token、词法分析、AST 与解析器
//! - [`runtime`]：解释器、作用域与内置函数
//! - [`value`]：运行时值模型
//! - [`command`]：Command 定义
//! - [`host`]：Host trait 与内存宿主
//! - [`diagnostic`]：脚本静态检查
//! - [`error`]：错误类型定义

pub mod command;
pub mod diagnostic;
pub mod error;
pub mod host;
pub mod runtime;
pub mod script;
pub mod value;

// 重导出核心类型
pub use command::Command;
pub use diagnostic::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_script, declared_functions,
};
pub use error::{ParseError, RuntimeError, ScriptError};
pub use host::{BufferHost, Host};
pub use runtime::{
    BUILTIN_NAMES, DEFAULT_MAX_CALL_DEPTH, Eval, ExitRequested, Flow, Interpreter,
    MAX_CALL_DEPTH_LIMIT, ScopeId, Scopes, is_builtin,
};
pub use script::{
    BinaryOp, CaseBlock, Condition, Expr, FunctionDecl, Lexer, LiteralKind, MAX_NESTING_DEPTH,
    Parser, Script, Stmt, Token, TokenKind, parse, tokenize,
};
pub use value::Value;
