//! # 内置函数
//!
//! 名字固定的宿主函数表。除 `puppetevent` 外都返回 no-value 标记。
//!
//! | 名字 | 效果 |
//! |------|------|
//! | `puppetspeak(sound)` | [`Command::PlayDialogSound`] |
//! | `message(text)` | [`Command::DesignerComment`] |
//! | `puppetclear()` | [`Command::ClearAnswers`] |
//! | `puppetbevel(text, id)` | [`Command::AddAnswer`] |
//! | `puppetevent()` | 阻塞读取一行回答，返回整数 |
//! | `spotmovie(name)` | [`Command::PlayMovie`] |
//! | `opentrackfile(track)` | [`Command::StartTrack`] |
//! | `closetrackfile(track)` | [`Command::StopTrack`] |
//! | `delay(amount)` | [`Command::Delay`] |
//! | `advancephase()` | 全局 `phase` 加一 |

use tracing::debug;

use crate::command::Command;
use crate::error::RuntimeError;
use crate::host::Host;
use crate::runtime::engine::Interpreter;
use crate::value::Value;

/// 内置函数名
pub const BUILTIN_NAMES: &[&str] = &[
    "puppetspeak",
    "message",
    "puppetclear",
    "puppetbevel",
    "puppetevent",
    "spotmovie",
    "opentrackfile",
    "closetrackfile",
    "delay",
    "advancephase",
];

/// 是否为内置函数名（大小写敏感）
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// 第 `index` 个实参的文本，缺失时为 `nil`
fn arg(args: &[Value], index: usize) -> String {
    args.get(index).unwrap_or(&Value::Nil).to_string()
}

impl<H: Host> Interpreter<H> {
    /// 调用内置函数；不是内置函数时返回 `None`
    pub(super) fn call_builtin(&mut self, name: &str, args: &[Value]) -> Option<Value> {
        let command = match name {
            "puppetspeak" => Command::PlayDialogSound {
                sound: arg(args, 0),
            },
            "message" => Command::DesignerComment { text: arg(args, 0) },
            "puppetclear" => Command::ClearAnswers,
            "puppetbevel" => Command::AddAnswer {
                text: arg(args, 0),
                id: arg(args, 1),
            },
            "spotmovie" => Command::PlayMovie { name: arg(args, 0) },
            "opentrackfile" => Command::StartTrack { track: arg(args, 0) },
            "closetrackfile" => Command::StopTrack { track: arg(args, 0) },
            "delay" => Command::Delay {
                amount: arg(args, 0),
            },
            "puppetevent" => return Some(self.read_answer()),
            "advancephase" => {
                self.advance_phase();
                return Some(Value::NoValue);
            }
            _ => return None,
        };

        self.host.execute(&command);
        Some(Value::NoValue)
    }

    /// 从宿主读取回答编号
    fn read_answer(&mut self) -> Value {
        let Some(line) = self.host.read_answer() else {
            self.report(RuntimeError::InvalidAnswer {
                input: "<end of input>".to_string(),
            });
            return Value::Nil;
        };

        let input = line.trim();
        match input.parse::<i64>() {
            Ok(id) => Value::Integer(id),
            Err(_) => {
                self.report(RuntimeError::InvalidAnswer {
                    input: input.to_string(),
                });
                Value::Nil
            }
        }
    }

    /// 全局 `phase` 加一
    ///
    /// 未绑定或为 `Nil` 时视为 0。
    fn advance_phase(&mut self) {
        let next = match self.scopes.global("phase") {
            None | Some(Value::Nil) => Value::Integer(1),
            Some(Value::Integer(n)) => Value::Integer(n.wrapping_add(1)),
            Some(Value::Float(x)) => Value::Float(x + 1.0),
            Some(other) => {
                let actual = format!("{} ({})", other, other.type_name());
                self.report(RuntimeError::PhaseNotNumeric { actual });
                return;
            }
        };

        debug!(phase = %next, "advancephase");
        self.scopes.set_global("phase", next);
    }
}
