//! # Token 模块
//!
//! 词法分析器输出的 token 模型。token 一经产生即不可变。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 关键字集合（大小写敏感）
pub const KEYWORDS: &[&str] = &[
    "code", "endcode", "global", "local", "if", "else", "endif", "exitcode", "switch", "case",
    "endswitch", "while", "endwhile", "return",
];

/// 判断文本是否为关键字
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// 关键字：`if`、`endif` 等
    Keyword,
    /// 变量名或函数名；无法分类的内容也归为此类
    Identifier,
    /// 字符串（不含引号）
    String,
    /// 纯数字
    Number,
    /// 单字符符号：`(` `)` `,` `=`
    Symbol,
    /// `true` / `false`（文本已转为小写）
    Boolean,
    /// 由 `global` / `local` 行末注入的换行
    Newline,
    /// 输入结束
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Keyword => "KEYWORD",
            Self::Identifier => "IDENTIFIER",
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Symbol => "SYMBOL",
            Self::Boolean => "BOOLEAN",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// 词法 token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// token 类型
    pub kind: TokenKind,
    /// 原始文本
    pub text: String,
    /// 所在行号（从 1 开始）
    pub line: usize,
}

impl Token {
    /// 创建 token
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// 创建 EOF token
    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }

    /// 是否为指定符号
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == symbol
    }

    /// 是否为指定关键字（大小写不敏感，用于块边界匹配）
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text.eq_ignore_ascii_case(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_set() {
        assert!(is_keyword("endcode"));
        assert!(is_keyword("exitcode"));
        assert!(!is_keyword("ENDCODE"));
        assert!(!is_keyword("message"));
    }

    #[test]
    fn test_token_predicates() {
        let eq = Token::new(TokenKind::Symbol, "=", 1);
        assert!(eq.is_symbol("="));
        assert!(!eq.is_symbol("("));

        let endif = Token::new(TokenKind::Keyword, "endif", 4);
        assert!(endif.is_keyword("ENDIF"));
        assert!(!endif.is_keyword("else"));
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Identifier, "pennybrush", 2);
        assert_eq!(token.to_string(), "IDENTIFIER 'pennybrush'");
    }
}
