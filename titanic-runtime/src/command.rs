//! # Command 模块
//!
//! 定义解释器向 Host 发出的所有展示指令。
//! 内置函数只通过 Command 与外界交互，自身不做任何 IO。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **无副作用**：Command 本身不执行任何操作
//! - **宿主无关**：`Display` 给出控制台文本，其他宿主可以自行解释

use std::fmt;

use serde::{Deserialize, Serialize};

/// 解释器向 Host 发出的指令
///
/// 参数保留脚本传入值的文本形式；缺失的参数为 `nil`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// 播放对话音效（`puppetspeak`）
    PlayDialogSound { sound: String },

    /// 关卡设计者注释（`message`）
    DesignerComment { text: String },

    /// 隐藏当前对话角色的所有回答选项（`puppetclear`）
    ClearAnswers,

    /// 添加回答选项（`puppetbevel`）
    AddAnswer { text: String, id: String },

    /// 播放视频（`spotmovie`）
    PlayMovie { name: String },

    /// 开始播放音轨（`opentrackfile`）
    StartTrack { track: String },

    /// 停止播放音轨（`closetrackfile`）
    StopTrack { track: String },

    /// 延时（`delay`），数值不做解释
    Delay { amount: String },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayDialogSound { sound } => write!(f, "Play dialog sound: '{sound}'."),
            Self::DesignerComment { text } => write!(f, "Level designer comment: '{text}'."),
            Self::ClearAnswers => {
                write!(f, "Hide answers to the character you are talking to.")
            }
            Self::AddAnswer { text, id } => write!(f, "Add answer option (id '{id}'): '{text}'."),
            Self::PlayMovie { name } => write!(f, "Launch video: '{name}'."),
            Self::StartTrack { track } => write!(f, "Start playing track: '{track}'."),
            Self::StopTrack { track } => write!(f, "Stop playing track: '{track}'."),
            Self::Delay { amount } => write!(f, "Adding a delay of: '{amount}'."),
        }
    }
}
