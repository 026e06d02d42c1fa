//! # Config 模块
//!
//! 控制台驱动的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (titanic.json)
//! 3. 默认值（最低）

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use titanic_runtime::{DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH_LIMIT, Value};

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 初始全局变量（只允许标量）
    #[serde(default = "default_globals")]
    pub globals: BTreeMap<String, serde_json::Value>,

    /// 退出交互循环的命令（大小写不敏感）
    #[serde(default = "default_exit_command")]
    pub exit_command: String,

    /// 加载后立即调用一次的函数
    #[serde(default)]
    pub entry_function: Option<String>,

    /// 调用深度上限（1 到 [`MAX_CALL_DEPTH_LIMIT`]）
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    /// 日志过滤器（`RUST_LOG` 语法）
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// 是否以 JSON 输出语句列表
    #[serde(default)]
    pub dump_ast: bool,
}

// 默认值函数
fn default_globals() -> BTreeMap<String, serde_json::Value> {
    BTreeMap::from([
        ("mission".to_string(), serde_json::Value::from(1)),
        ("phase".to_string(), serde_json::Value::from(0)),
        (
            "pennybrush".to_string(),
            serde_json::Value::from("firstEncounter"),
        ),
    ])
}

fn default_exit_command() -> String {
    "exit".to_string()
}

fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            globals: default_globals(),
            exit_command: default_exit_command(),
            entry_function: None,
            max_call_depth: default_max_call_depth(),
            log_filter: default_log_filter(),
            dump_ast: false,
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时返回 `Ok(None)`，由调用方决定使用默认配置；
    /// 读取失败、解析失败或验证失败都返回错误。
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(Some(config))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_call_depth == 0 || self.max_call_depth > MAX_CALL_DEPTH_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "max_call_depth 必须在 1 - {MAX_CALL_DEPTH_LIMIT} 之间"
            )));
        }

        if self.exit_command.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "exit_command 不能为空".to_string(),
            ));
        }

        self.initial_globals().map(|_| ())
    }

    /// 把配置中的全局变量转换为脚本值
    ///
    /// 整数 → `Integer`，其余数字 → `Float`，字符串 → `Str`，
    /// 布尔 → `Bool`，`null` → `Nil`；数组和对象不被接受。
    pub fn initial_globals(&self) -> Result<Vec<(String, Value)>, ConfigError> {
        self.globals
            .iter()
            .map(|(name, json)| Ok((name.clone(), json_to_value(name, json)?)))
            .collect()
    }
}

fn json_to_value(name: &str, json: &serde_json::Value) -> Result<Value, ConfigError> {
    use serde_json::Value as Json;

    let value = match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::Bool(*b),
        Json::String(s) => Value::Str(s.clone()),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).ok_or_else(|| {
                ConfigError::ValidationFailed(format!("全局变量 {name} 的数值无法表示: {n}"))
            })?,
        },
        Json::Array(_) | Json::Object(_) => {
            return Err(ConfigError::ValidationFailed(format!(
                "全局变量 {name} 必须是标量（数字、字符串、布尔或 null）"
            )));
        }
    };
    Ok(value)
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// JSON 解析或序列化失败
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
