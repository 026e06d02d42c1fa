//! # titanic - Titanic 脚本控制台
//!
//! ```text
//! titanic <SCRIPT> [--config PATH] [--log FILTER] [--dump-tokens] [--dump-ast]
//!                  [--call NAME]... [--no-repl]
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use titanic_cli::driver::report_parse_errors;
use titanic_cli::{AppConfig, ConsoleHost, Session, SessionOptions, resolve_log_filter};
use titanic_runtime::{Interpreter, Script, tokenize};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "titanic")]
#[command(about = "Titanic 脚本解释器控制台")]
struct Cli {
    /// 脚本文件路径
    script: PathBuf,

    /// 配置文件路径
    #[arg(short, long, default_value = "titanic.json")]
    config: PathBuf,

    /// 日志过滤器（优先于 RUST_LOG 和配置文件）
    #[arg(long)]
    log: Option<String>,

    /// 输出 token 流
    #[arg(long)]
    dump_tokens: bool,

    /// 以 JSON 输出语句列表
    #[arg(long)]
    dump_ast: bool,

    /// 加载后依次调用的函数（可重复）
    #[arg(long = "call", value_name = "NAME")]
    calls: Vec<String>,

    /// 不进入交互循环
    #[arg(long)]
    no_repl: bool,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("titanic error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(&cli.config)
        .with_context(|| format!("无法加载配置文件: {}", cli.config.display()))?;
    let config_found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    let filter = resolve_log_filter(
        cli.log.as_deref(),
        std::env::var("RUST_LOG").ok(),
        &config.log_filter,
    );
    init_tracing(&filter)?;

    if config_found {
        info!(path = %cli.config.display(), "配置文件加载成功");
    } else {
        info!(path = %cli.config.display(), "配置文件不存在，使用默认配置");
    }

    let source = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("无法读取脚本文件: {}", cli.script.display()))?;
    let script_id = cli
        .script
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.script.display().to_string());

    if cli.dump_tokens {
        for token in tokenize(&source) {
            println!("{token}");
        }
    }

    let script = Script::load(script_id, &source);
    let error_count = report_parse_errors(&script, &mut io::stderr())?;
    if error_count > 0 {
        warn!(errors = error_count, "脚本包含解析错误，继续执行已解析的语句");
    }

    if cli.dump_ast || config.dump_ast {
        let json = serde_json::to_string_pretty(&script.statements)
            .context("语句列表序列化失败")?;
        println!("{json}");
    }

    let mut interpreter = Interpreter::new(ConsoleHost::stdio())
        .with_max_call_depth(config.max_call_depth)
        .with_globals(config.initial_globals()?);

    let options = SessionOptions {
        exit_command: config.exit_command.clone(),
        entry_function: config.entry_function.clone(),
        calls: cli.calls,
        interactive: !cli.no_repl,
    };
    Session::new(&mut interpreter, &options, io::stderr())
        .run(&script)
        .context("控制台输出失败")?;

    Ok(())
}

/// 初始化日志，输出到 stderr，不与脚本输出交错
fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("无效的日志过滤器: {filter}"))?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init()
        .context("日志初始化失败")?;
    Ok(())
}
