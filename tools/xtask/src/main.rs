//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 titanic-runtime 覆盖率
//! - `script-check`: 检查脚本文件（语法、未定义函数、重复声明）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use titanic_runtime::{DiagnosticResult, Script, analyze_script, declared_functions};
use walkdir::WalkDir;

/// 脚本文件扩展名
const SCRIPT_EXTENSION: &str = "tscript";

/// 默认脚本目录（相对于 workspace root）
const DEFAULT_SCRIPTS_DIR: &str = "scripts";

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "titanic-runtime", "--html"]);
            run("cargo llvm-cov -p titanic-runtime --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "script-check" => {
            let path = args.next();
            script_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 titanic-runtime 覆盖率报告
  script-check    检查脚本文件

SCRIPT-CHECK:
  cargo xtask script-check [path]

  不带参数：检查 scripts/ 下所有 .tscript 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - 脚本语法错误
    - 调用了既未声明也非内置的函数
    - 重复声明、语句块内声明的函数
    - 函数外的 return

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo script-check  -> cargo xtask script-check
"#
    );
}

//=============================================================================
// script-check 命令实现
//=============================================================================

/// 脚本检查结果
#[derive(Default)]
struct ScriptCheckResult {
    /// 检查的脚本数量
    scripts_checked: usize,
    /// 无法读取的文件数量
    unreadable: usize,
    /// 声明的函数总数
    functions_declared: usize,
    /// 诊断结果
    diagnostics: DiagnosticResult,
}

/// 执行脚本检查
fn script_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_script_files(&path)?
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_SCRIPTS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认脚本目录不存在: {}\n请在 workspace 根目录运行，或指定脚本路径",
                    dir.display()
                );
            }
            collect_script_files(dir)?
        }
    };

    if files.is_empty() {
        eprintln!("未找到脚本文件（.{SCRIPT_EXTENSION}）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个脚本文件...\n", files.len());

    let mut result = ScriptCheckResult::default();
    for file in &files {
        check_script_file(file, &mut result);
    }

    print_check_result(&result);

    if result.unreadable > 0 || result.diagnostics.has_errors() {
        anyhow::bail!("脚本检查发现错误");
    }

    Ok(())
}

/// 收集目录下的所有脚本文件
fn collect_script_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION)
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// 检查单个脚本文件
fn check_script_file(file: &Path, result: &mut ScriptCheckResult) {
    let script_id = file.display().to_string();
    result.scripts_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {}", script_id, e);
            result.unreadable += 1;
            return;
        }
    };

    // 解析错误由 analyze_script 转成 Error 级诊断
    let script = Script::load(&script_id, &content);
    result.functions_declared += declared_functions(&script).len();
    result.diagnostics.merge(analyze_script(&script));
}

/// 输出检查结果
fn print_check_result(result: &ScriptCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!(
        "检查完成: {} 个脚本, {} 个函数",
        result.scripts_checked, result.functions_declared
    );
    eprintln!();

    if !result.diagnostics.is_empty() {
        for diag in &result.diagnostics.diagnostics {
            eprintln!("{}", diag);
        }
        eprintln!();
    }

    let error_count = result.unreadable + result.diagnostics.error_count();
    let warn_count = result.diagnostics.warn_count();

    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
