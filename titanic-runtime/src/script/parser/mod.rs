//! # Parser 模块
//!
//! 手写递归下降解析器，把 token 序列转换为语句列表。
//!
//! ## 架构
//!
//! ```text
//! 原始文本 → [Lexer] → Vec<Token> → [Parser] → Vec<Stmt>
//! ```
//!
//! ## 设计原则
//!
//! - 一个 token 的前瞻，外加区分赋值 / 调用语句的额外前瞻
//! - 容错解析：出错的语句记录错误后跳过，解析永不中止
//! - 错误按出现顺序收集，行号取自出错位置的 token
//!
//! ## 模块结构
//!
//! - `helpers`: token 游标操作
//! - `statement`: 语句与语句块解析
//! - `expr_parser`: 表达式与条件解析

mod expr_parser;
mod helpers;
mod statement;


use tracing::debug;

use crate::error::ParseError;
use crate::script::ast::{Script, Stmt};
use crate::script::lexer::Lexer;
use crate::script::token::Token;

/// 语句块与调用表达式的最大嵌套层数
///
/// 超出的部分记录 `Nesting too deep` 后整体跳过，避免递归耗尽栈空间。
pub const MAX_NESTING_DEPTH: usize = 64;

/// 脚本解析器
///
/// 借用 token 序列；越过序列末尾时所有读取都返回合成的 EOF token。
pub struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    errors: Vec<ParseError>,
    eof: Token,
    /// 当前嵌套层数
    depth: usize,
}

impl<'t> Parser<'t> {
    /// 创建新的解析器
    pub fn new(tokens: &'t [Token]) -> Self {
        let eof_line = tokens.last().map_or(1, |t| t.line);
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            eof: Token::eof(eof_line),
            depth: 0,
        }
    }

    /// 解析全部 token，直到 EOF
    ///
    /// 可以重复调用；每次都从头开始并清空之前的错误。
    pub fn parse(&mut self) -> Vec<Stmt> {
        self.current = 0;
        self.depth = 0;
        self.errors.clear();

        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
        }
        statements
    }

    /// 获取解析错误
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// 取走解析错误
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }
}

/// 便捷函数：解析 token 序列并丢弃错误
pub fn parse(tokens: &[Token]) -> Vec<Stmt> {
    Parser::new(tokens).parse()
}

impl Script {
    /// 从源文本加载脚本
    ///
    /// 依次运行词法与语法分析，两个阶段的错误合并到 `Script::errors`。
    pub fn load(id: impl Into<String>, source: &str) -> Self {
        let id = id.into();

        let mut lexer = Lexer::new();
        let tokens = lexer.tokenize(source);
        let mut errors = lexer.take_errors();

        let mut parser = Parser::new(&tokens);
        let statements = parser.parse();
        errors.extend(parser.take_errors());

        debug!(
            script = %id,
            statements = statements.len(),
            errors = errors.len(),
            "脚本加载完成"
        );

        Self {
            id,
            statements,
            errors,
        }
    }
}
