//! # Console 模块
//!
//! 控制台宿主：把 [`Command`] 渲染为一行文本，并从输入流读取回答。
//!
//! 输入输出是泛型的，运行时使用 stdin/stdout，测试使用内存缓冲区。

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use titanic_runtime::{Command, Host};
use tracing::warn;

/// 回答输入提示
pub const ANSWER_PROMPT: &str = "Enter the answer id: ";

/// 控制台宿主
pub struct ConsoleHost<R, W> {
    input: R,
    output: W,
}

impl ConsoleHost<StdinLock<'static>, Stdout> {
    /// 使用标准输入输出
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    /// 使用给定的输入输出创建
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 输出带标题的分隔行：`=== TITLE ===`，前后各一个空行
    pub fn title(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== {text} ===")?;
        writeln!(self.output)
    }

    /// 输出一行普通消息
    pub fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// 输出空行
    pub fn new_line(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// 读取一行输入（去掉行尾换行符），输入结束时返回 `None`
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// 输出端
    pub fn output(&self) -> &W {
        &self.output
    }

    /// 拆回输入输出
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Host for ConsoleHost<R, W> {
    fn execute(&mut self, command: &Command) {
        if let Err(e) = writeln!(self.output, "{command}") {
            warn!(error = %e, "命令输出失败");
        }
    }

    fn read_answer(&mut self) -> Option<String> {
        let prompt = write!(self.output, "{ANSWER_PROMPT}");
        match prompt.and_then(|()| self.read_line()) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "读取回答失败");
                None
            }
        }
    }
}
