//! # Engine 模块
//!
//! 树遍历解释器的入口与公共 API。
//!
//! ## 执行模型
//!
//! ```text
//! run_script(script)          顶层语句执行一次（注册函数、初始化全局变量）
//! call_function(name, args)   宿主反复调用的入口
//! ```
//!
//! 控制转移不是错误：
//!
//! - `return` 以 [`Flow::Return`] 向上传递，在函数调用边界被消费
//! - `exitcode` 以 `Err(ExitRequested)` 向上传递，`?` 负责展开，
//!   由发起顶层调用的宿主消费

use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::RuntimeError;
use crate::host::Host;
use crate::runtime::scope::{ScopeId, Scopes};
use crate::script::ast::{FunctionDecl, Script, Stmt};
use crate::value::Value;

/// 默认调用深度上限
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// 可配置的调用深度上限的最大值
///
/// 每层脚本调用都会占用若干层 Rust 栈帧，更大的值会在达到上限之前耗尽栈空间。
pub const MAX_CALL_DEPTH_LIMIT: usize = 1024;

/// 语句执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// 正常执行完毕
    Normal,
    /// 遇到 `return`
    Return(Value),
}

/// `exitcode` 信号：终止当前顶层调用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRequested;

/// 可能被 `exitcode` 打断的执行结果
pub type Eval<T> = Result<T, ExitRequested>;

/// 脚本解释器
///
/// # 使用示例
///
/// ```ignore
/// let script = Script::load("main", source);
/// let mut interpreter = Interpreter::new(BufferHost::new());
/// interpreter.set_global("phase", Value::Integer(0));
///
/// interpreter.run_script(&script)?;
/// let result = interpreter.call_function("greet", vec![], interpreter.root());
/// ```
pub struct Interpreter<H> {
    /// 作用域 arena
    pub(super) scopes: Scopes,
    /// 宿主
    pub(super) host: H,
    /// 运行时错误（非致命）
    pub(super) errors: Vec<RuntimeError>,
    /// 调用深度上限
    max_call_depth: usize,
    /// 当前调用深度
    call_depth: usize,
}

impl<H: Host> Interpreter<H> {
    /// 创建新的解释器
    pub fn new(host: H) -> Self {
        Self {
            scopes: Scopes::new(),
            host,
            errors: Vec::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            call_depth: 0,
        }
    }

    /// 设置调用深度上限，超过 [`MAX_CALL_DEPTH_LIMIT`] 的值按最大值处理
    pub fn with_max_call_depth(mut self, limit: usize) -> Self {
        if limit > MAX_CALL_DEPTH_LIMIT {
            warn!(requested = limit, limit = MAX_CALL_DEPTH_LIMIT, "调用深度上限过大，已收紧");
        }
        self.max_call_depth = limit.min(MAX_CALL_DEPTH_LIMIT);
        self
    }

    /// 调用深度上限
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// 批量设置全局变量
    pub fn with_globals<I, S>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        for (name, value) in globals {
            self.scopes.set_global(name, value);
        }
        self
    }

    /// 根作用域
    pub fn root(&self) -> ScopeId {
        self.scopes.root()
    }

    /// 作用域 arena
    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    /// 读取全局变量
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.scopes.global(name)
    }

    /// 设置全局变量
    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.scopes.set_global(name, value);
    }

    /// 宿主
    pub fn host(&self) -> &H {
        &self.host
    }

    /// 宿主（可变）
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// 取回宿主
    pub fn into_host(self) -> H {
        self.host
    }

    /// 运行时错误
    pub fn errors(&self) -> &[RuntimeError] {
        &self.errors
    }

    /// 取走运行时错误
    pub fn take_errors(&mut self) -> Vec<RuntimeError> {
        std::mem::take(&mut self.errors)
    }

    /// 在根作用域执行脚本顶层语句
    ///
    /// 顶层的 `return` 只结束顶层语句列表，返回值被丢弃。
    pub fn run_script(&mut self, script: &Script) -> Eval<()> {
        debug!(script = %script.id, statements = script.len(), "执行顶层语句");
        let root = self.root();
        self.run(&script.statements, root)?;
        Ok(())
    }

    /// 在指定作用域中依次执行语句
    pub fn run(&mut self, statements: &[Stmt], scope: ScopeId) -> Eval<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt, scope)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// 调用函数
    ///
    /// 解析顺序：脚本声明的函数 → 内置函数 → 未知函数（记录错误，返回 no-value）。
    ///
    /// 脚本函数在以根作用域为父帧的新帧中执行：形参按位置绑定，
    /// 多余实参忽略，缺失实参为 `Nil`；没有 `return` 时返回 `Nil`。
    pub fn call_function(&mut self, name: &str, args: Vec<Value>, scope: ScopeId) -> Eval<Value> {
        if let Some(decl) = self.scopes.function(scope, name) {
            return self.call_user_function(&decl, args);
        }

        if let Some(result) = self.call_builtin(name, &args) {
            return Ok(result);
        }

        self.report(RuntimeError::UnknownFunction {
            name: name.to_string(),
        });
        Ok(Value::NoValue)
    }

    fn call_user_function(&mut self, decl: &Rc<FunctionDecl>, args: Vec<Value>) -> Eval<Value> {
        if self.call_depth >= self.max_call_depth {
            self.report(RuntimeError::CallDepthExceeded {
                name: decl.name.clone(),
                limit: self.max_call_depth,
            });
            return Ok(Value::Nil);
        }

        debug!(function = %decl.name, args = args.len(), "调用函数");

        let frame = self.scopes.push(self.scopes.root());
        let mut args = args.into_iter();
        for param in &decl.params {
            let value = args.next().unwrap_or(Value::Nil);
            self.scopes.define(frame, param.as_str(), value);
        }

        self.call_depth += 1;
        let outcome = self.run(&decl.body, frame);
        self.call_depth -= 1;
        self.scopes.pop(frame);

        match outcome? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }

    /// 记录一条运行时错误并继续
    pub(super) fn report(&mut self, error: RuntimeError) {
        warn!(error = %error, "脚本运行时错误");
        self.errors.push(error);
    }
}
