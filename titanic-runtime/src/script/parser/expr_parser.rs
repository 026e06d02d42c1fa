//! # 表达式解析器
//!
//! 单层语法，没有优先级：
//!
//! ```text
//! expr      := IDENT "(" [ expr ("," expr)* ] ")"
//!            | IDENT
//!            | STRING | NUMBER | BOOLEAN
//! condition := expr "=" expr
//! ```
//!
//! 条件只支持一次 `=` 比较，不支持 and / or 串联。

use crate::script::ast::{BinaryOp, Condition, Expr, LiteralKind};
use crate::script::token::TokenKind;

use super::{MAX_NESTING_DEPTH, Parser};

impl Parser<'_> {
    /// 解析表达式，失败时记录错误并返回 `None`（不消费 token）
    pub(super) fn parse_expression(&mut self) -> Option<Expr> {
        let token = self.peek().clone();

        let literal_kind = match token.kind {
            TokenKind::Identifier => {
                let is_call = self.look_ahead(1).is_some_and(|next| next.is_symbol("("));
                if is_call {
                    return self.parse_call_expression();
                }
                self.advance();
                return Some(Expr::Variable(token.text));
            }
            TokenKind::String => LiteralKind::String,
            TokenKind::Number => LiteralKind::Number,
            TokenKind::Boolean => LiteralKind::Boolean,
            _ => {
                self.error_at(token.line, "Unsupported expression format");
                return None;
            }
        };

        self.advance();
        Some(Expr::Literal {
            kind: literal_kind,
            text: token.text,
        })
    }

    /// 解析调用表达式：`name(arg, ...)`
    ///
    /// 嵌套超过 [`MAX_NESTING_DEPTH`] 时记录错误，跳过整组括号并返回 `None`。
    fn parse_call_expression(&mut self) -> Option<Expr> {
        let name = self.advance().text;

        if self.depth >= MAX_NESTING_DEPTH {
            self.error_here("Nesting too deep");
            self.skip_parenthesized();
            return None;
        }

        self.depth += 1;
        let call = self.parse_call_arguments(name);
        self.depth -= 1;
        call
    }

    fn parse_call_arguments(&mut self, name: String) -> Option<Expr> {
        if !self.match_symbol("(") {
            self.error_here("Expected '(' after function name in expression");
            return None;
        }

        let mut args = Vec::new();
        while !self.is_at_end() {
            if self.check_symbol(")") {
                break;
            }

            if let Some(arg) = self.parse_expression() {
                args.push(arg);
            }

            if self.check_symbol(",") {
                self.advance();
            } else if self.check_symbol(")") {
                break;
            } else {
                self.error_here("Expected ',' or ')' in function call arguments");
                break;
            }
        }

        if !self.match_symbol(")") {
            self.error_here("Missing ')' after function call arguments");
            return None;
        }

        Some(Expr::Call { name, args })
    }

    /// 解析条件：`expr = expr`
    ///
    /// 永远返回一个条件节点；解析失败的一侧留空，以便继续解析后续内容。
    pub(super) fn parse_condition(&mut self) -> Condition {
        let Some(left) = self.parse_expression() else {
            self.error_here("Could not parse left side of if condition");
            return Condition {
                left: None,
                op: BinaryOp::Eq,
                right: None,
            };
        };

        if !self.peek().is_symbol("=") {
            self.error_here("Expected '=' in if condition");
            return Condition {
                left: Some(left),
                op: BinaryOp::Eq,
                right: None,
            };
        }
        self.advance();

        let right = self.parse_expression();
        if right.is_none() {
            self.error_here("Could not parse right side of if condition");
        }

        Condition {
            left: Some(left),
            op: BinaryOp::Eq,
            right,
        }
    }
}
