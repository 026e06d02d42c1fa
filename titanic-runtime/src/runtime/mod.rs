//! # Runtime 模块
//!
//! 树遍历解释器，负责作用域管理、语句执行和函数分派。
//!
//! ## 模块结构
//!
//! - [`engine`]：解释器入口与控制转移类型
//! - [`executor`]：语句执行与表达式求值
//! - [`builtins`]：内置函数表
//! - [`scope`]：作用域 arena

pub mod builtins;
pub mod engine;
pub mod executor;
pub mod scope;

pub use builtins::{BUILTIN_NAMES, is_builtin};
pub use engine::{
    DEFAULT_MAX_CALL_DEPTH, Eval, ExitRequested, Flow, Interpreter, MAX_CALL_DEPTH_LIMIT,
};
pub use scope::{ScopeId, Scopes};
