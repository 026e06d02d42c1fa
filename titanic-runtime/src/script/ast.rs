//! # AST 模块
//!
//! 定义脚本的抽象语法树（Abstract Syntax Tree）。
//!
//! ## 设计说明
//!
//! AST 是解析器的输出，一次构建、多次读取（脚本可以循环）。
//! 语句与表达式都是封闭的 sum type，解释器对其做穷尽匹配。

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// 字面量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    /// 字符串字面量
    String,
    /// 数字字面量
    Number,
    /// 布尔字面量
    Boolean,
}

/// 二元运算符
///
/// 语法层目前只能产生 `Eq`，其余运算符只能通过直接构造 AST 使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `=`：值相等
    Eq,
    /// `!=`
    NotEq,
    /// `>`：仅数字
    Greater,
    /// `<`：仅数字
    Less,
    /// `&`：逻辑与（先做真值转换）
    And,
}

/// 比较 / 逻辑节点
///
/// 既是 `if` / `while` 的条件，也是表达式层的二元运算节点。
/// 解析失败时某一侧可能缺失，缺失的一侧求值为 `Nil`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// 左操作数
    pub left: Option<Expr>,
    /// 运算符
    pub op: BinaryOp,
    /// 右操作数
    pub right: Option<Expr>,
}

impl Condition {
    /// 创建完整的二元节点
    pub fn new(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self {
            left: Some(left),
            op,
            right: Some(right),
        }
    }

    /// 创建 `left = right` 条件
    pub fn equals(left: Expr, right: Expr) -> Self {
        Self::new(left, BinaryOp::Eq, right)
    }
}

/// 表达式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// 字面量，保留原始文本，求值时再转换
    Literal { kind: LiteralKind, text: String },

    /// 变量引用
    Variable(String),

    /// 函数调用
    Call { name: String, args: Vec<Expr> },

    /// 二元运算
    Binary(Box<Condition>),
}

impl Expr {
    /// 创建字符串字面量
    pub fn string(s: impl Into<String>) -> Self {
        Self::Literal {
            kind: LiteralKind::String,
            text: s.into(),
        }
    }

    /// 创建数字字面量
    pub fn number(text: impl Into<String>) -> Self {
        Self::Literal {
            kind: LiteralKind::Number,
            text: text.into(),
        }
    }

    /// 创建布尔字面量
    pub fn bool(b: bool) -> Self {
        Self::Literal {
            kind: LiteralKind::Boolean,
            text: b.to_string(),
        }
    }

    /// 创建变量引用
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// 创建函数调用
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            name: name.into(),
            args,
        }
    }

    /// 创建二元运算
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self::Binary(Box::new(Condition::new(left, op, right)))
    }
}

/// 函数声明（`code name(params) ... endcode`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// 函数名
    pub name: String,
    /// 形参列表
    pub params: Vec<String>,
    /// 函数体
    pub body: Vec<Stmt>,
}

/// `switch` 中的一个 `case` 块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBlock {
    /// case 值（可以是任意表达式）
    pub value: Expr,
    /// case 体
    pub body: Vec<Stmt>,
}

/// 语句
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// 赋值：`name = expr`
    Assignment { name: String, value: Expr },

    /// 函数调用语句：`name(args...)`
    Call { name: String, args: Vec<Expr> },

    /// 函数声明
    FunctionDecl(FunctionDecl),

    /// 全局变量声明：`global a, b`
    Global { names: Vec<String> },

    /// 局部变量声明：`local a, b`
    Local { names: Vec<String> },

    /// 条件分支（`else` 块可以为空）
    If {
        condition: Condition,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },

    /// 多路分支，命中第一个匹配的 case 后停止
    Switch {
        selector: Expr,
        cases: Vec<CaseBlock>,
    },

    /// 循环
    While { condition: Condition, body: Vec<Stmt> },

    /// 返回（值可省略）
    Return { value: Option<Expr> },

    /// 终止当前顶层调用
    ExitCode,
}

impl Stmt {
    /// 如果是函数声明，返回其引用
    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match self {
            Self::FunctionDecl(decl) => Some(decl),
            _ => None,
        }
    }

    /// 返回该语句直接包含的所有子语句块
    pub fn child_blocks(&self) -> Vec<&[Stmt]> {
        match self {
            Self::FunctionDecl(decl) => vec![decl.body.as_slice()],
            Self::If {
                then_body,
                else_body,
                ..
            } => vec![then_body.as_slice(), else_body.as_slice()],
            Self::Switch { cases, .. } => cases.iter().map(|c| c.body.as_slice()).collect(),
            Self::While { body, .. } => vec![body.as_slice()],
            _ => Vec::new(),
        }
    }
}

/// 加载后的脚本
///
/// 持有语句列表以及词法 / 语法阶段收集到的所有错误。
/// 解析永不失败：出错的语句被跳过，其余语句照常保留。
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// 脚本标识符
    pub id: String,
    /// 顶层语句
    pub statements: Vec<Stmt>,
    /// 解析错误（按出现顺序）
    pub errors: Vec<ParseError>,
}

impl Script {
    /// 是否存在解析错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 顶层语句数量
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
