//! # 辅助函数
//!
//! token 游标操作：一个 token 的前瞻，外加一个用于区分赋值 / 调用的额外前瞻。

use crate::error::ParseError;
use crate::script::token::{Token, TokenKind};

use super::Parser;

/// 开启语句块的关键字
const BLOCK_OPENERS: &[&str] = &["code", "if", "while", "switch"];

/// 结束语句块的关键字
const BLOCK_CLOSERS: &[&str] = &["endcode", "endif", "endwhile", "endswitch"];

impl Parser<'_> {
    /// 是否到达输入末尾
    pub(super) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// 返回当前 token，不消费
    ///
    /// 越过 token 序列末尾时返回合成的 EOF token。
    pub(super) fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    /// 向后看 `offset` 个 token
    pub(super) fn look_ahead(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset)
    }

    /// 消费并返回当前 token（到达末尾时不再前进）
    pub(super) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// 最近一次消费的 token
    fn previous(&self) -> Token {
        match self.current.checked_sub(1) {
            Some(index) => self.tokens[index].clone(),
            None => self.peek().clone(),
        }
    }

    /// 当前 token 是否为指定类型（末尾时为 false）
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// 当前 token 是否为指定符号
    pub(super) fn check_symbol(&self, symbol: &str) -> bool {
        !self.is_at_end() && self.peek().is_symbol(symbol)
    }

    /// 若当前 token 为指定符号则消费
    pub(super) fn match_symbol(&mut self, symbol: &str) -> bool {
        if self.check_symbol(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 当前 token 是否为指定关键字（大小写不敏感）
    pub(super) fn check_keyword(&self, keyword: &str) -> bool {
        !self.is_at_end() && self.peek().is_keyword(keyword)
    }

    /// 若当前 token 为指定关键字则消费
    pub(super) fn match_keyword(&mut self, keyword: &str) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// 跳过嵌套过深的语句块，停在同层的边界关键字前（不消费）
    ///
    /// 块开头关键字与结束关键字成对计数，只识别深度为 0 的边界。
    pub(super) fn skip_block(&mut self, boundaries: &[&str]) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            let token = self.peek();
            if token.kind == TokenKind::Keyword {
                let text = token.text.as_str();
                if depth == 0 && boundaries.iter().any(|b| text.eq_ignore_ascii_case(b)) {
                    return;
                }
                if BLOCK_OPENERS.iter().any(|k| text.eq_ignore_ascii_case(k)) {
                    depth += 1;
                } else if BLOCK_CLOSERS.iter().any(|k| text.eq_ignore_ascii_case(k)) {
                    depth = depth.saturating_sub(1);
                }
            }
            self.advance();
        }
    }

    /// 跳过一组括号及其内容（当前 token 为 `(`），不越过当前行
    pub(super) fn skip_parenthesized(&mut self) {
        let line = self.peek().line;
        let mut depth = 0usize;
        while !self.is_at_end() && self.peek().line == line {
            if self.check_symbol("(") {
                depth += 1;
            } else if self.check_symbol(")") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.advance();
                    return;
                }
            }
            self.advance();
        }
    }

    /// 记录一条"期望 X"类错误，行号取当前 token
    pub(super) fn error_here(&mut self, message: impl Into<String>) {
        let line = self.peek().line;
        self.error_at(line, message);
    }

    /// 在指定行记录错误
    pub(super) fn error_at(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(ParseError::expected(line, message));
    }
}
