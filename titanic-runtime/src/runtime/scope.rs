//! # Scope 模块
//!
//! 作用域链，以 arena 方式存储。
//!
//! ## 设计说明
//!
//! 每个作用域帧保存变量表、函数表以及父帧的 [`ScopeId`]。
//! 帧按栈的方式压入 / 弹出：函数调用时压入子帧，返回时弹出，
//! 因此父帧总是比子帧活得更久，用下标引用父帧不会悬空。
//!
//! 根帧（下标 0）永远存在，保存脚本级全局变量和函数表。

use std::collections::HashMap;
use std::rc::Rc;

use crate::script::ast::FunctionDecl;
use crate::value::Value;

/// 作用域句柄（arena 下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// 根作用域
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Default)]
struct Frame {
    vars: HashMap<String, Value>,
    functions: HashMap<String, Rc<FunctionDecl>>,
    parent: Option<ScopeId>,
}

/// 作用域 arena
#[derive(Debug)]
pub struct Scopes {
    frames: Vec<Frame>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    /// 创建只含根帧的 arena
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// 根作用域
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// 当前帧数（含根帧）
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 压入以 `parent` 为父帧的新帧
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.frames.len());
        self.frames.push(Frame {
            parent: Some(parent),
            ..Frame::default()
        });
        id
    }

    /// 弹出 `scope` 及其之上的所有帧
    ///
    /// 根帧不会被弹出。
    pub fn pop(&mut self, scope: ScopeId) {
        debug_assert_eq!(scope.0 + 1, self.frames.len(), "scope popped out of order");
        self.frames.truncate(scope.0.max(1));
    }

    fn frame(&self, scope: ScopeId) -> &Frame {
        &self.frames[scope.0]
    }

    fn frame_mut(&mut self, scope: ScopeId) -> &mut Frame {
        &mut self.frames[scope.0]
    }

    /// 从 `scope` 到根依次访问的帧
    fn chain(&self, scope: ScopeId) -> impl Iterator<Item = &Frame> {
        std::iter::successors(Some(self.frame(scope)), |frame| {
            frame.parent.map(|parent| self.frame(parent))
        })
    }

    // =========================================================================
    // 变量
    // =========================================================================

    /// 沿作用域链查找变量
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Value> {
        self.chain(scope).find_map(|frame| frame.vars.get(name))
    }

    /// 读取变量，未绑定时为 `Nil`
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Value {
        self.get(scope, name).cloned().unwrap_or(Value::Nil)
    }

    /// `scope` 自身（不含父帧）是否绑定了该名字
    pub fn has_local(&self, scope: ScopeId, name: &str) -> bool {
        self.frame(scope).vars.contains_key(name)
    }

    /// 在 `scope` 中直接绑定（覆盖已有值）
    pub fn define(&mut self, scope: ScopeId, name: impl Into<String>, value: Value) {
        self.frame_mut(scope).vars.insert(name.into(), value);
    }

    /// 赋值
    ///
    /// 根帧已有同名绑定时写入根帧，否则写入 `scope`。
    /// 局部遮蔽对写入不生效。
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) {
        let target = if self.has_local(ScopeId::ROOT, name) {
            ScopeId::ROOT
        } else {
            scope
        };
        self.define(target, name, value);
    }

    /// `global` 声明：根帧没有该名字时绑定为 `Nil`
    pub fn declare_global(&mut self, name: &str) {
        self.frame_mut(ScopeId::ROOT)
            .vars
            .entry(name.to_string())
            .or_insert(Value::Nil);
    }

    /// `local` 声明：`scope` 没有该名字时绑定为 `Integer(0)`
    pub fn declare_local(&mut self, scope: ScopeId, name: &str) {
        self.frame_mut(scope)
            .vars
            .entry(name.to_string())
            .or_insert(Value::Integer(0));
    }

    /// 读取全局变量
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.frame(ScopeId::ROOT).vars.get(name)
    }

    /// 设置全局变量
    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.define(ScopeId::ROOT, name, value);
    }

    /// 全局变量快照（按名字排序）
    pub fn globals(&self) -> Vec<(&str, &Value)> {
        let mut globals: Vec<_> = self
            .frame(ScopeId::ROOT)
            .vars
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        globals.sort_by(|a, b| a.0.cmp(b.0));
        globals
    }

    // =========================================================================
    // 函数
    // =========================================================================

    /// 在 `scope` 的函数表中注册函数（同名覆盖）
    pub fn define_function(&mut self, scope: ScopeId, decl: Rc<FunctionDecl>) {
        self.frame_mut(scope)
            .functions
            .insert(decl.name.clone(), decl);
    }

    /// 沿作用域链查找函数
    pub fn function(&self, scope: ScopeId, name: &str) -> Option<Rc<FunctionDecl>> {
        self.chain(scope)
            .find_map(|frame| frame.functions.get(name))
            .cloned()
    }

    /// 已注册的函数名（按名字排序）
    pub fn function_names(&self, scope: ScopeId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .chain(scope)
            .flat_map(|frame| frame.functions.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_to_root() {
        let mut scopes = Scopes::new();
        scopes.set_global("mission", Value::Integer(1));

        let child = scopes.push(scopes.root());
        scopes.define(child, "x", Value::from("local"));

        assert_eq!(scopes.lookup(child, "mission"), Value::Integer(1));
        assert_eq!(scopes.lookup(child, "x"), Value::from("local"));
        assert_eq!(scopes.lookup(child, "missing"), Value::Nil);
        assert_eq!(scopes.lookup(ScopeId::ROOT, "x"), Value::Nil);
    }

    #[test]
    fn test_pop_discards_locals() {
        let mut scopes = Scopes::new();
        let child = scopes.push(ScopeId::ROOT);
        scopes.define(child, "tmp", Value::Integer(9));
        assert_eq!(scopes.depth(), 2);

        scopes.pop(child);
        assert_eq!(scopes.depth(), 1);

        let again = scopes.push(ScopeId::ROOT);
        assert_eq!(again, child);
        assert_eq!(scopes.lookup(again, "tmp"), Value::Nil);
    }

    #[test]
    fn test_assign_writes_through_to_existing_global() {
        let mut scopes = Scopes::new();
        scopes.set_global("phase", Value::Integer(0));

        let child = scopes.push(ScopeId::ROOT);
        scopes.declare_local(child, "phase");
        scopes.assign(child, "phase", Value::Integer(5));

        assert_eq!(scopes.global("phase"), Some(&Value::Integer(5)));
        // 局部声明仍保持默认值
        assert!(scopes.has_local(child, "phase"));
        assert_eq!(scopes.lookup(child, "phase"), Value::Integer(0));

        scopes.assign(child, "fresh", Value::Bool(true));
        assert_eq!(scopes.global("fresh"), None);
        assert_eq!(scopes.lookup(child, "fresh"), Value::Bool(true));
    }

    #[test]
    fn test_declarations_never_overwrite() {
        let mut scopes = Scopes::new();
        scopes.set_global("mission", Value::Integer(3));
        scopes.declare_global("mission");
        scopes.declare_global("counter");
        assert_eq!(scopes.global("mission"), Some(&Value::Integer(3)));
        assert_eq!(scopes.global("counter"), Some(&Value::Nil));

        scopes.define(ScopeId::ROOT, "x", Value::from("keep"));
        scopes.declare_local(ScopeId::ROOT, "x");
        scopes.declare_local(ScopeId::ROOT, "y");
        assert_eq!(scopes.lookup(ScopeId::ROOT, "x"), Value::from("keep"));
        assert_eq!(scopes.lookup(ScopeId::ROOT, "y"), Value::Integer(0));
    }

    #[test]
    fn test_functions_resolve_through_chain() {
        let mut scopes = Scopes::new();
        let decl = Rc::new(FunctionDecl {
            name: "greet".to_string(),
            params: vec![],
            body: vec![],
        });
        scopes.define_function(ScopeId::ROOT, decl);

        let child = scopes.push(ScopeId::ROOT);
        let grandchild = scopes.push(child);
        assert!(scopes.function(grandchild, "greet").is_some());
        assert!(scopes.function(grandchild, "other").is_none());
        assert_eq!(scopes.function_names(grandchild), vec!["greet"]);
    }

    #[test]
    fn test_globals_snapshot_is_sorted() {
        let mut scopes = Scopes::new();
        scopes.set_global("phase", Value::Integer(0));
        scopes.set_global("mission", Value::Integer(1));
        let names: Vec<&str> = scopes.globals().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["mission", "phase"]);
    }
}
