//! # Script 模块
//!
//! 脚本前端：源文本 → token → AST。
//!
//! ## 模块结构
//!
//! - [`token`]：token 模型与关键字表
//! - [`lexer`]：按行扫描的词法分析器
//! - [`ast`]：脚本抽象语法树定义
//! - [`parser`]：递归下降解析器

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use lexer::{Lexer, tokenize};
pub use parser::{MAX_NESTING_DEPTH, Parser, parse};
pub use token::{Token, TokenKind};
