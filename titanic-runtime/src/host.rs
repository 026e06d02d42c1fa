//! # Host 模块
//!
//! 解释器与外部世界之间的边界。
//!
//! ```text
//! Interpreter                    Host
//!   │                              │
//!   │──── execute(&Command) ─────►│  展示
//!   │──── read_answer() ─────────►│  阻塞读取一行
//!   │◄─── Option<String> ─────────│
//! ```
//!
//! 解释器只在内置函数分派时调用 Host。

use std::collections::VecDeque;

use crate::command::Command;

/// 宿主能力：展示输出 + 行输入
pub trait Host {
    /// 执行一条展示指令
    fn execute(&mut self, command: &Command);

    /// 读取一行回答；输入结束时返回 `None`
    fn read_answer(&mut self) -> Option<String>;
}

impl<H: Host + ?Sized> Host for &mut H {
    fn execute(&mut self, command: &Command) {
        (**self).execute(command);
    }

    fn read_answer(&mut self) -> Option<String> {
        (**self).read_answer()
    }
}

/// 内存宿主
///
/// 记录所有收到的指令，并按顺序提供预设的回答。
/// 用于测试和无界面嵌入。
#[derive(Debug, Clone, Default)]
pub struct BufferHost {
    commands: Vec<Command>,
    answers: VecDeque<String>,
}

impl BufferHost {
    /// 创建空宿主
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带预设回答的宿主
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: Vec::new(),
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    /// 追加一条回答
    pub fn push_answer(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    /// 已收到的指令
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// 取走已收到的指令
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// 已收到指令的控制台文本
    pub fn lines(&self) -> Vec<String> {
        self.commands.iter().map(ToString::to_string).collect()
    }
}

impl Host for BufferHost {
    fn execute(&mut self, command: &Command) {
        self.commands.push(command.clone());
    }

    fn read_answer(&mut self) -> Option<String> {
        self.answers.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_host_records_and_answers() {
        let mut host = BufferHost::with_answers(["1", "2"]);
        host.execute(&Command::ClearAnswers);
        assert_eq!(host.commands(), &[Command::ClearAnswers]);
        assert_eq!(
            host.lines(),
            vec!["Hide answers to the character you are talking to."]
        );

        assert_eq!(host.read_answer().as_deref(), Some("1"));
        host.push_answer("3");
        assert_eq!(host.read_answer().as_deref(), Some("2"));
        assert_eq!(host.read_answer().as_deref(), Some("3"));
        assert_eq!(host.read_answer(), None);

        assert_eq!(host.take_commands().len(), 1);
        assert!(host.commands().is_empty());
    }

    #[test]
    fn test_mut_ref_is_a_host() {
        fn drive(mut host: impl Host) {
            host.execute(&Command::ClearAnswers);
        }

        let mut host = BufferHost::new();
        drive(&mut host);
        assert_eq!(host.commands().len(), 1);
    }
}
