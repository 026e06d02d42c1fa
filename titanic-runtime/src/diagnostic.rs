//! # 诊断模块
//!
//! 提供脚本静态检查和诊断 API，不依赖 IO。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 复用 parser/AST，不重复解析逻辑

use std::collections::{HashMap, HashSet};

use crate::runtime::builtins::is_builtin;
use crate::script::{Condition, Expr, Script, Stmt};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 脚本 ID / 文件路径
    pub script_id: String,
    /// 行号（如果可定位，从 1 开始）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 诊断详情（可选，如所在函数）
    pub detail: Option<String>,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            script_id: script_id.into(),
            line: None,
            message: message.into(),
            detail: None,
        }
    }

    /// 创建错误诊断
    pub fn error(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, script_id, message)
    }

    /// 创建警告诊断
    pub fn warn(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, script_id, message)
    }

    /// 创建信息诊断
    pub fn info(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, script_id, message)
    }

    /// 设置行号
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.script_id)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  | {}", detail)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

//=============================================================================
// 脚本分析 API
//=============================================================================

/// 分析脚本，返回诊断结果
///
/// 执行以下检查：
/// - 词法 / 语法错误（Error，带行号）
/// - 调用既未声明也非内置的函数（Warn）
/// - 重复声明的函数（Warn，后声明者覆盖前者）
/// - 嵌套在语句块中的函数声明（Info，仍然注册到全局函数表）
/// - 函数外的 `return`（Info，只结束顶层语句列表）
pub fn analyze_script(script: &Script) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    for error in &script.errors {
        result.push(Diagnostic::error(&script.id, error.to_string()).with_line(error.line()));
    }

    let declared: HashSet<&str> = declared_functions(script).into_iter().collect();
    let mut analyzer = Analyzer {
        script_id: &script.id,
        declared: &declared,
        seen: HashMap::new(),
        result: &mut result,
    };
    analyzer.visit_block(&script.statements, Context::TOP_LEVEL);

    result
}

/// 获取脚本中声明的所有函数名（含嵌套声明，按出现顺序）
pub fn declared_functions(script: &Script) -> Vec<&str> {
    let mut names = Vec::new();
    collect_declarations(&script.statements, &mut names);
    names
}

fn collect_declarations<'a>(statements: &'a [Stmt], names: &mut Vec<&'a str>) {
    for stmt in statements {
        if let Some(decl) = stmt.as_function() {
            names.push(decl.name.as_str());
        }
        for block in stmt.child_blocks() {
            collect_declarations(block, names);
        }
    }
}

/// 遍历位置
#[derive(Clone, Copy)]
struct Context<'a> {
    /// 所在函数
    function: Option<&'a str>,
    /// 是否位于顶层语句列表
    top_level: bool,
}

impl Context<'_> {
    const TOP_LEVEL: Context<'static> = Context {
        function: None,
        top_level: true,
    };

    fn describe(&self) -> String {
        match self.function {
            Some(name) => format!("位于函数 '{}'", name),
            None => "位于顶层语句".to_string(),
        }
    }
}

struct Analyzer<'a> {
    script_id: &'a str,
    declared: &'a HashSet<&'a str>,
    /// 函数名 → 已出现次数
    seen: HashMap<&'a str, usize>,
    result: &'a mut DiagnosticResult,
}

impl<'a> Analyzer<'a> {
    fn visit_block(&mut self, statements: &'a [Stmt], ctx: Context<'a>) {
        for stmt in statements {
            self.visit_stmt(stmt, ctx);
        }
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt, ctx: Context<'a>) {
        let nested = Context {
            top_level: false,
            ..ctx
        };

        match stmt {
            Stmt::Assignment { value, .. } => self.visit_expr(value, ctx),
            Stmt::Call { name, args } => {
                self.check_call(name, ctx);
                self.visit_exprs(args, ctx);
            }
            Stmt::FunctionDecl(decl) => {
                let count = self.seen.entry(decl.name.as_str()).or_insert(0);
                *count += 1;
                if *count == 2 {
                    self.result.push(
                        Diagnostic::warn(
                            self.script_id,
                            format!("函数 **{}** 被重复声明", decl.name),
                        )
                        .with_detail("执行到的最后一个声明生效"),
                    );
                }

                if !ctx.top_level {
                    self.result.push(
                        Diagnostic::info(
                            self.script_id,
                            format!("函数 **{}** 声明在语句块内部", decl.name),
                        )
                        .with_detail(format!(
                            "{}；执行到该声明后仍注册到全局函数表",
                            ctx.describe()
                        )),
                    );
                }

                let body_ctx = Context {
                    function: Some(decl.name.as_str()),
                    top_level: false,
                };
                self.visit_block(&decl.body, body_ctx);
            }
            Stmt::Global { .. } | Stmt::Local { .. } | Stmt::ExitCode => {}
            Stmt::If {
                condition,
                then_body,
                else_body,
            } => {
                self.visit_condition(condition, ctx);
                self.visit_block(then_body, nested);
                self.visit_block(else_body, nested);
            }
            Stmt::Switch { selector, cases } => {
                self.visit_expr(selector, ctx);
                for case in cases {
                    self.visit_expr(&case.value, ctx);
                    self.visit_block(&case.body, nested);
                }
            }
            Stmt::While { condition, body } => {
                self.visit_condition(condition, ctx);
                self.visit_block(body, nested);
            }
            Stmt::Return { value } => {
                if ctx.function.is_none() {
                    self.result.push(
                        Diagnostic::info(self.script_id, "函数外的 return")
                            .with_detail("只会结束顶层语句列表"),
                    );
                }
                if let Some(value) = value {
                    self.visit_expr(value, ctx);
                }
            }
        }
    }

    fn visit_condition(&mut self, condition: &'a Condition, ctx: Context<'a>) {
        for side in [&condition.left, &condition.right].into_iter().flatten() {
            self.visit_expr(side, ctx);
        }
    }

    fn visit_exprs(&mut self, exprs: &'a [Expr], ctx: Context<'a>) {
        for expr in exprs {
            self.visit_expr(expr, ctx);
        }
    }

    fn visit_expr(&mut self, expr: &'a Expr, ctx: Context<'a>) {
        match expr {
            Expr::Literal { .. } | Expr::Variable(_) => {}
            Expr::Call { name, args } => {
                self.check_call(name, ctx);
                self.visit_exprs(args, ctx);
            }
            Expr::Binary(condition) => self.visit_condition(condition, ctx),
        }
    }

    fn check_call(&mut self, name: &str, ctx: Context<'a>) {
        if self.declared.contains(name) || is_builtin(name) {
            return;
        }
        self.result.push(
            Diagnostic::warn(self.script_id, format!("调用了未定义的函数: **{}**", name))
                .with_detail(ctx.describe()),
        );
    }
}
