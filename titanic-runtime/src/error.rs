//! # Error 模块
//!
//! 定义 titanic-runtime 中使用的错误类型。
//!
//! 所有错误都是**可恢复**的：解析错误与运行时错误只进入错误通道，
//! 不会中断整个脚本。`return` / `exitcode` 是控制转移信号，不在此处建模。

use thiserror::Error;

/// 解析错误
///
/// 词法与语法阶段共用。`Display` 固定为 `[Line N] Error: <message>`。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 字符串未闭合
    #[error("[Line {line}] Error: Unterminated string")]
    UnterminatedString { line: usize },

    /// 未知关键字（出现在语句开头的块边界关键字等）
    #[error("[Line {line}] Error: Unknown keyword: {keyword}")]
    UnknownKeyword { line: usize, keyword: String },

    /// 无法作为语句开头的 token
    #[error("[Line {line}] Error: Cannot parse statement. Unexpected token: {token}")]
    UnexpectedToken { line: usize, token: String },

    /// 通用的"期望 X"类错误
    #[error("[Line {line}] Error: {message}")]
    Expected { line: usize, message: String },
}

impl ParseError {
    /// 创建通用错误
    pub fn expected(line: usize, message: impl Into<String>) -> Self {
        Self::Expected {
            line,
            message: message.into(),
        }
    }

    /// 错误所在行号（从 1 开始）
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::UnknownKeyword { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::Expected { line, .. } => *line,
        }
    }
}

/// 运行时错误
///
/// 解释器遇到这些错误时会替换为中性值（`Nil` 或 no-value）并继续执行。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// 既不是脚本函数也不是内置函数
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// 数字字面量无法表示为 64 位整数
    #[error("Invalid number literal: {text}")]
    InvalidNumber { text: String },

    /// `puppetevent` 读到的回答不是整数（或输入已结束）
    #[error("Invalid answer id: {input}")]
    InvalidAnswer { input: String },

    /// `advancephase` 发现全局 `phase` 不是数字
    #[error("Global 'phase' is not a number: {actual}")]
    PhaseNotNumeric { actual: String },

    /// 函数调用嵌套过深
    #[error("Call depth limit {limit} exceeded while calling '{name}'")]
    CallDepthExceeded { name: String, limit: usize },
}

/// titanic-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// 解析错误
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// 运行时错误
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_has_line_prefix() {
        let err = ParseError::expected(7, "Missing 'endif' after if/else block");
        assert_eq!(
            err.to_string(),
            "[Line 7] Error: Missing 'endif' after if/else block"
        );
        assert_eq!(err.line(), 7);

        let err = ParseError::UnterminatedString { line: 3 };
        assert_eq!(err.to_string(), "[Line 3] Error: Unterminated string");
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::UnknownFunction {
            name: "frobnicate".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown function: frobnicate");
    }

    #[test]
    fn test_script_error_from() {
        let err: ScriptError = RuntimeError::UnknownFunction {
            name: "x".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown function: x");
        assert!(matches!(err, ScriptError::Runtime(_)));
    }
}
