//! # 语句解析
//!
//! 按首个 token 分派：关键字选择对应的语句形式；标识符后跟 `=` 为赋值，
//! 否则为调用语句。无法解析的语句记录错误后返回 `None`，解析器继续前进。

use crate::error::ParseError;
use crate::script::ast::{CaseBlock, FunctionDecl, Stmt};
use crate::script::token::TokenKind;

use super::{MAX_NESTING_DEPTH, Parser};

impl Parser<'_> {
    /// 解析单条语句
    pub(super) fn parse_statement(&mut self) -> Option<Stmt> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "code" => self.parse_function_decl(),
                "global" => self.parse_global(),
                "local" => Some(self.parse_local()),
                "exitcode" => {
                    self.advance();
                    Some(Stmt::ExitCode)
                }
                "if" => self.parse_if(),
                "switch" => self.parse_switch(),
                "while" => self.parse_while(),
                "return" => Some(self.parse_return()),
                _ => {
                    self.errors.push(ParseError::UnknownKeyword {
                        line: token.line,
                        keyword: token.text,
                    });
                    self.advance();
                    None
                }
            },

            TokenKind::Identifier => {
                let is_assignment = self.look_ahead(1).is_some_and(|next| next.is_symbol("="));
                if is_assignment {
                    self.parse_assignment()
                } else {
                    self.parse_call_statement()
                }
            }

            TokenKind::Newline => {
                self.advance();
                None
            }

            _ => {
                self.errors.push(ParseError::UnexpectedToken {
                    line: token.line,
                    token: token.to_string(),
                });
                self.advance();
                None
            }
        }
    }

    /// 解析语句块，直到遇到任一边界关键字（不消费）或输入结束
    ///
    /// 超过 [`MAX_NESTING_DEPTH`] 时记录错误并跳过整个块。
    pub(super) fn parse_block(&mut self, boundaries: &[&str]) -> Vec<Stmt> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.error_here("Nesting too deep");
            self.skip_block(boundaries);
            return Vec::new();
        }

        self.depth += 1;
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let token = self.peek();
            if token.kind == TokenKind::Keyword
                && boundaries.iter().any(|b| token.text.eq_ignore_ascii_case(b))
            {
                break;
            }

            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
        }
        self.depth -= 1;

        statements
    }

    /// `name = expr`
    fn parse_assignment(&mut self) -> Option<Stmt> {
        let name = self.advance().text;

        if !self.check_symbol("=") {
            self.error_here("Expected '=' in assignment");
            return None;
        }
        self.advance();

        let Some(value) = self.parse_expression() else {
            self.error_here("Failed to parse right-hand side expression in assignment");
            return None;
        };

        Some(Stmt::Assignment { name, value })
    }

    /// `name(arg, ...)`，两侧括号都必须存在
    fn parse_call_statement(&mut self) -> Option<Stmt> {
        let name = self.advance().text;

        if !self.match_symbol("(") {
            self.error_here("Expected '(' after function name in function call statement");
            return None;
        }

        let mut args = Vec::new();
        while !self.check_symbol(")") && !self.is_at_end() {
            let Some(arg) = self.parse_expression() else {
                break;
            };
            args.push(arg);

            if self.check_symbol(",") {
                self.advance();
            } else {
                break;
            }
        }

        if !self.match_symbol(")") {
            self.error_here("Missing ')' after function call arguments");
            return None;
        }

        Some(Stmt::Call { name, args })
    }

    /// `code name [(params)] ... endcode`
    fn parse_function_decl(&mut self) -> Option<Stmt> {
        self.advance();

        if !self.check(TokenKind::Identifier) {
            self.error_here("Expected identifier after 'code'");
            return None;
        }
        let name = self.advance().text;

        let params = self.parse_parameter_list();
        let body = self.parse_block(&["endcode"]);

        if !self.match_keyword("endcode") {
            self.error_here("Missing 'endcode' after function declaration");
            return None;
        }

        Some(Stmt::FunctionDecl(FunctionDecl { name, params, body }))
    }

    /// 可选的形参列表；没有 `(` 时为零个参数
    fn parse_parameter_list(&mut self) -> Vec<String> {
        let mut params = Vec::new();

        if !self.check_symbol("(") {
            return params;
        }
        self.advance();

        while !self.is_at_end() {
            if self.check_symbol(")") {
                break;
            }

            if self.check(TokenKind::Identifier) {
                params.push(self.advance().text);
            } else {
                self.error_here("Expected an identifier in parameter list");
            }

            if self.check_symbol(",") {
                self.advance();
            } else if self.check_symbol(")") {
                break;
            } else {
                self.error_here("Expected ',' or ')' in parameter list");
                break;
            }
        }

        if !self.match_symbol(")") {
            self.error_here("Missing ')' after parameter list");
        }

        params
    }

    /// 读取逗号分隔的标识符，遇到其他 token（通常是注入的换行）停止
    fn parse_name_list(&mut self) -> Vec<String> {
        let mut names = Vec::new();

        while !self.is_at_end() {
            if self.check(TokenKind::Identifier) {
                names.push(self.advance().text);
            } else if self.check_symbol(",") {
                self.advance();
            } else {
                break;
            }
        }

        names
    }

    /// `global a, b`
    fn parse_global(&mut self) -> Option<Stmt> {
        self.advance();

        let names = self.parse_name_list();
        if names.is_empty() {
            self.error_here("Expected at least one identifier after 'global'");
            return None;
        }

        Some(Stmt::Global { names })
    }

    /// `local a, b`
    fn parse_local(&mut self) -> Stmt {
        self.advance();
        Stmt::Local {
            names: self.parse_name_list(),
        }
    }

    /// `if cond ... [else ...] endif`
    fn parse_if(&mut self) -> Option<Stmt> {
        self.advance();

        let condition = self.parse_condition();
        let then_body = self.parse_block(&["else", "endif"]);

        let else_body = if self.check_keyword("else") {
            self.advance();
            self.parse_block(&["endif"])
        } else {
            Vec::new()
        };

        if !self.match_keyword("endif") {
            self.error_here("Missing 'endif' after if/else block");
            return None;
        }

        Some(Stmt::If {
            condition,
            then_body,
            else_body,
        })
    }

    /// `while cond ... endwhile`
    fn parse_while(&mut self) -> Option<Stmt> {
        self.advance();

        let condition = self.parse_condition();
        let body = self.parse_block(&["endwhile"]);

        if !self.match_keyword("endwhile") {
            self.error_here("Missing 'endwhile' after while block");
            return None;
        }

        Some(Stmt::While { condition, body })
    }

    /// `switch expr (case value ...)* endswitch`
    fn parse_switch(&mut self) -> Option<Stmt> {
        self.advance();

        let Some(selector) = self.parse_expression() else {
            self.error_here("Could not parse expression after 'switch'");
            return None;
        };

        let mut cases = Vec::new();
        while !self.is_at_end() {
            if self.check_keyword("endswitch") {
                break;
            }

            if self.check_keyword("case") {
                if let Some(case) = self.parse_case_block() {
                    cases.push(case);
                }
            } else {
                self.error_here("Expected 'case' or 'endswitch' in switch block");
                self.advance();
            }
        }

        if !self.match_keyword("endswitch") {
            self.error_here("Missing 'endswitch' after switch block");
            return None;
        }

        Some(Stmt::Switch { selector, cases })
    }

    /// `case value ...`，到下一个 `case` 或 `endswitch` 为止
    fn parse_case_block(&mut self) -> Option<CaseBlock> {
        self.advance();

        let Some(value) = self.parse_expression() else {
            self.error_here("Failed to parse case value expression");
            return None;
        };

        let body = self.parse_block(&["case", "endswitch"]);
        Some(CaseBlock { value, body })
    }

    /// `return [expr]`
    ///
    /// 返回值必须与 `return` 位于同一行，否则视为无返回值。
    fn parse_return(&mut self) -> Stmt {
        let keyword = self.advance();

        let value = if !self.is_at_end() && self.peek().line == keyword.line {
            self.parse_expression()
        } else {
            None
        };

        Stmt::Return { value }
    }
}
