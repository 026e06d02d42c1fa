//! # Lexer 模块
//!
//! 按行扫描脚本文本，产生扁平的 token 序列。
//!
//! ## 扫描规则（按优先级）
//!
//! 每个物理行先在第一个 `//` 处截断并去掉首尾空白，然后从左到右：
//!
//! 1. 跳过空白
//! 2. `(` `)` `,` `=` 各自成为一个 `Symbol`
//! 3. `"` 开始的字符串（无转义），到下一个 `"` 或行尾为止
//! 4. 其余内容读到空白、`(`、`)`、`,`、`"` 为止，再分类为
//!    `Boolean` / `Keyword` / `Number` / `Identifier`
//!
//! 词法分析永不失败：未闭合的字符串记录错误，但仍产生 `String` token。

use crate::error::ParseError;

use super::token::{Token, TokenKind, is_keyword};

/// 词法分析器
#[derive(Debug, Default)]
pub struct Lexer {
    /// 词法错误（非致命）
    errors: Vec<ParseError>,
}

impl Lexer {
    /// 创建新的词法分析器
    pub fn new() -> Self {
        Self::default()
    }

    /// 对整段脚本进行词法分析
    ///
    /// 末尾总会追加一个 `Eof` token，行号为总行数 + 1。
    pub fn tokenize(&mut self, source: &str) -> Vec<Token> {
        self.errors.clear();

        let mut tokens = Vec::new();
        let mut line_count = 0;

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;
            line_count = line_number;

            let line_tokens = self.tokenize_line(line, line_number);

            // global / local 声明没有语句终结符，用换行 token 截断
            let needs_newline = line_tokens
                .first()
                .is_some_and(|t| t.text == "global" || t.text == "local");

            tokens.extend(line_tokens);
            if needs_newline {
                tokens.push(Token::new(TokenKind::Newline, "", line_number));
            }
        }

        tokens.push(Token::eof(line_count + 1));
        tokens
    }

    /// 获取词法错误
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// 取走词法错误
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// 扫描单行
    fn tokenize_line(&mut self, line: &str, line_number: usize) -> Vec<Token> {
        let line = strip_comment(line).trim();
        let mut tokens = Vec::new();
        let mut chars = line.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            if matches!(c, '(' | ')' | ',' | '=') {
                chars.next();
                tokens.push(Token::new(TokenKind::Symbol, c.to_string(), line_number));
                continue;
            }

            if c == '"' {
                chars.next();
                let content_start = start + c.len_utf8();
                let mut content_end = line.len();
                let mut terminated = false;
                for (i, ch) in chars.by_ref() {
                    if ch == '"' {
                        content_end = i;
                        terminated = true;
                        break;
                    }
                }
                if !terminated {
                    self.errors
                        .push(ParseError::UnterminatedString { line: line_number });
                }
                tokens.push(Token::new(
                    TokenKind::String,
                    &line[content_start..content_end],
                    line_number,
                ));
                continue;
            }

            let mut end = line.len();
            while let Some(&(i, ch)) = chars.peek() {
                if is_chunk_terminator(ch) {
                    end = i;
                    break;
                }
                chars.next();
            }
            tokens.push(classify_chunk(&line[start..end], line_number));
        }

        tokens
    }
}

/// 便捷函数：词法分析并丢弃错误
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new().tokenize(source)
}

/// 截断行注释
fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn is_chunk_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ',' | '"')
}

/// 对一段连续文本进行分类
fn classify_chunk(text: &str, line: usize) -> Token {
    if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
        return Token::new(TokenKind::Boolean, text.to_ascii_lowercase(), line);
    }

    if is_keyword(text) {
        return Token::new(TokenKind::Keyword, text, line);
    }

    if text.chars().all(|c| c.is_ascii_digit()) {
        return Token::new(TokenKind::Number, text, line);
    }

    // switch 相关关键字不区分大小写
    for keyword in ["switch", "case", "endswitch"] {
        if text.eq_ignore_ascii_case(keyword) {
            return Token::new(TokenKind::Keyword, keyword, line);
        }
    }

    Token::new(TokenKind::Identifier, text, line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_call_line() {
        let tokens = tokenize(r#"puppetbevel("Hello there", 2)"#);
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::String,
                TokenKind::Symbol,
                TokenKind::Number,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            texts(&tokens),
            vec!["puppetbevel", "(", "Hello there", ",", "2", ")", ""]
        );
    }

    #[test]
    fn test_token_stream_snapshot() {
        let tokens = tokenize("x = 5");
        insta::assert_debug_snapshot!(tokens, @r#"
        [
            Token {
                kind: Identifier,
                text: "x",
                line: 1,
            },
            Token {
                kind: Symbol,
                text: "=",
                line: 1,
            },
            Token {
                kind: Number,
                text: "5",
                line: 1,
            },
            Token {
                kind: Eof,
                text: "",
                line: 2,
            },
        ]
        "#);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let source = "// header comment\n\nmessage(\"hi\") // trailing\n   \n";
        let tokens = tokenize(source);
        assert_eq!(texts(&tokens), vec!["message", "(", "hi", ")", ""]);
        assert_eq!(tokens[0].line, 3);
        // 4 行 -> EOF 行号为 5
        assert_eq!(tokens.last().unwrap().line, 5);
    }

    #[test]
    fn test_classification() {
        let tokens = tokenize("if TRUE False 0042 x1 endif");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Boolean,
                TokenKind::Boolean,
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::Keyword,
                TokenKind::Eof,
            ]
        );
        // 布尔值文本统一为小写
        assert_eq!(tokens[1].text, "true");
        assert_eq!(tokens[2].text, "false");
    }

    #[test]
    fn test_keywords_are_case_sensitive_except_switch_family() {
        let tokens = tokenize("ENDIF Switch CASE EndSwitch");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].text, "switch");
        assert_eq!(tokens[2].text, "case");
        assert_eq!(tokens[3].text, "endswitch");
    }

    #[test]
    fn test_equals_inside_chunk_is_not_split() {
        // '=' 只在块开头时作为符号
        let tokens = tokenize("x=5");
        assert_eq!(texts(&tokens), vec!["x=5", ""]);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_newline_injected_after_declarations() {
        let tokens = tokenize("global mission, phase\nlocal a\nx = 1");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[4].line, 1);
        assert_eq!(tokens[7].line, 2);
    }

    #[test]
    fn test_unterminated_string_is_reported_but_kept() {
        let mut lexer = Lexer::new();
        let tokens = lexer.tokenize("message(\"oops");
        assert_eq!(texts(&tokens), vec!["message", "(", "oops", ""]);
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(
            lexer.errors(),
            &[ParseError::UnterminatedString { line: 1 }]
        );
    }

    #[test]
    fn test_string_keeps_inner_symbols() {
        let tokens = tokenize(r#"message("a, (b) = c")"#);
        assert_eq!(tokens[2].text, "a, (b) = c");
    }

    #[test]
    fn test_empty_source() {
        let tokens = tokenize("");
        assert_eq!(tokens, vec![Token::eof(1)]);
    }

    #[test]
    fn test_utf8_content() {
        let tokens = tokenize("message(\"Café déjà vu\") // ünïcode");
        assert_eq!(tokens[2].text, "Café déjà vu");
    }
}
