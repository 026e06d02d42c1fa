//! # Value 模块
//!
//! 解释期的动态值模型。
//!
//! 值只在解释阶段存在，AST 中的字面量以原始文本保存，求值时才转换为 `Value`。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 脚本运行时值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 整数
    Integer(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    Str(String),
    /// 布尔值
    Bool(bool),
    /// 空值（未绑定变量读出的值也是 `Nil`）
    #[default]
    Nil,
    /// 内置函数的"无返回值"标记，与 `Nil` 不同
    NoValue,
}

impl Value {
    /// 创建字符串值
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// 转换为 `f64`（仅数字）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// 真值判定
    ///
    /// - `Bool`：自身
    /// - 数字：非零为真
    /// - `Nil`：假
    /// - 其他（字符串、no-value）：真
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Nil => false,
            Self::Str(_) | Self::NoValue => true,
        }
    }

    /// 脚本层面的相等判定（`=` 运算符）
    ///
    /// `Nil` 只等于 `Nil`；不同表示的数字不相等（`Integer(1)` ≠ `Float(1.0)`）；
    /// no-value 标记不等于任何值。
    pub fn script_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }

    /// 数值大于比较，任一侧非数字时为 `false`
    pub fn greater_than(&self, other: &Value) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(l), Some(r)) => l > r,
            _ => false,
        }
    }

    /// 数值小于比较，任一侧非数字时为 `false`
    pub fn less_than(&self, other: &Value) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(l), Some(r)) => l < r,
            _ => false,
        }
    }

    /// 类型名（用于诊断信息）
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Str(_) => "Str",
            Self::Bool(_) => "Bool",
            Self::Nil => "Nil",
            Self::NoValue => "NoValue",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Str(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Nil => write!(f, "nil"),
            Self::NoValue => write!(f, "<no value>"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
