//! # titanic-cli
//!
//! Titanic 脚本的控制台驱动。
//!
//! - [`config`]：配置文件加载与验证
//! - [`console`]：控制台宿主（命令渲染、回答输入）
//! - [`driver`]：会话流程与交互循环

pub mod config;
pub mod console;
pub mod driver;

pub use config::{AppConfig, ConfigError};
pub use console::ConsoleHost;
pub use driver::{ReplInput, Session, SessionOptions, parse_command_line, resolve_log_filter};
