//! # Executor 模块
//!
//! 语句执行与表达式求值。
//!
//! ## 职责
//!
//! - 对 [`Stmt`] / [`Expr`] 做穷尽匹配
//! - 维护作用域中的变量绑定
//! - 传播 `return` 与 `exitcode`

use std::rc::Rc;

use tracing::debug;

use crate::error::RuntimeError;
use crate::host::Host;
use crate::runtime::engine::{Eval, ExitRequested, Flow, Interpreter};
use crate::runtime::scope::ScopeId;
use crate::script::ast::{BinaryOp, Condition, Expr, LiteralKind, Stmt};
use crate::value::Value;

impl<H: Host> Interpreter<H> {
    /// 执行单条语句
    pub(super) fn execute(&mut self, stmt: &Stmt, scope: ScopeId) -> Eval<Flow> {
        match stmt {
            Stmt::Assignment { name, value } => {
                let value = self.evaluate(value, scope)?;
                self.scopes.assign(scope, name, value);
            }

            Stmt::Call { name, args } => {
                let args = self.evaluate_args(args, scope)?;
                self.call_function(name, args, scope)?;
            }

            Stmt::FunctionDecl(decl) => {
                debug!(function = %decl.name, params = decl.params.len(), "注册函数");
                let root = self.scopes.root();
                self.scopes.define_function(root, Rc::new(decl.clone()));
            }

            Stmt::Global { names } => {
                for name in names {
                    self.scopes.declare_global(name);
                }
            }

            Stmt::Local { names } => {
                for name in names {
                    self.scopes.declare_local(scope, name);
                }
            }

            Stmt::If {
                condition,
                then_body,
                else_body,
            } => {
                let branch = if self.evaluate_condition(condition, scope)?.is_truthy() {
                    then_body
                } else {
                    else_body
                };
                return self.run(branch, scope);
            }

            Stmt::Switch { selector, cases } => {
                let selected = self.evaluate(selector, scope)?;
                for case in cases {
                    let value = self.evaluate(&case.value, scope)?;
                    if selected.script_eq(&value) {
                        return self.run(&case.body, scope);
                    }
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate_condition(condition, scope)?.is_truthy() {
                    if let Flow::Return(value) = self.run(body, scope)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }

            Stmt::Return { value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, scope)?,
                    None => Value::Nil,
                };
                return Ok(Flow::Return(value));
            }

            Stmt::ExitCode => {
                debug!("exitcode：终止当前调用");
                return Err(ExitRequested);
            }
        }

        Ok(Flow::Normal)
    }

    /// 表达式求值
    pub fn evaluate(&mut self, expr: &Expr, scope: ScopeId) -> Eval<Value> {
        match expr {
            Expr::Literal { kind, text } => Ok(self.evaluate_literal(*kind, text)),
            Expr::Variable(name) => Ok(self.scopes.lookup(scope, name)),
            Expr::Call { name, args } => {
                let args = self.evaluate_args(args, scope)?;
                self.call_function(name, args, scope)
            }
            Expr::Binary(condition) => self.evaluate_condition(condition, scope),
        }
    }

    /// 条件 / 二元运算求值
    ///
    /// 两侧都会求值（无短路）；缺失的一侧为 `Nil`。
    pub fn evaluate_condition(&mut self, condition: &Condition, scope: ScopeId) -> Eval<Value> {
        let left = self.evaluate_operand(condition.left.as_ref(), scope)?;
        let right = self.evaluate_operand(condition.right.as_ref(), scope)?;

        let result = match condition.op {
            BinaryOp::Eq => left.script_eq(&right),
            BinaryOp::NotEq => !left.script_eq(&right),
            BinaryOp::Greater => left.greater_than(&right),
            BinaryOp::Less => left.less_than(&right),
            BinaryOp::And => left.is_truthy() && right.is_truthy(),
        };
        Ok(Value::Bool(result))
    }

    fn evaluate_operand(&mut self, operand: Option<&Expr>, scope: ScopeId) -> Eval<Value> {
        match operand {
            Some(expr) => self.evaluate(expr, scope),
            None => Ok(Value::Nil),
        }
    }

    /// 从左到右求值实参
    fn evaluate_args(&mut self, args: &[Expr], scope: ScopeId) -> Eval<Vec<Value>> {
        args.iter().map(|arg| self.evaluate(arg, scope)).collect()
    }

    fn evaluate_literal(&mut self, kind: LiteralKind, text: &str) -> Value {
        match kind {
            LiteralKind::String => Value::string(text),
            LiteralKind::Boolean => Value::Bool(text.eq_ignore_ascii_case("true")),
            LiteralKind::Number => {
                let parsed = if text.contains('.') {
                    text.parse::<f64>().ok().map(Value::Float)
                } else {
                    text.parse::<i64>().ok().map(Value::Integer)
                };
                parsed.unwrap_or_else(|| {
                    self.report(RuntimeError::InvalidNumber {
                        text: text.to_string(),
                    });
                    Value::Nil
                })
            }
        }
    }
}
