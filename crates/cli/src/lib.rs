//! `varguard` 命令行
//!
//! 读取配置，逐个检查样式表文件，输出诊断

pub mod config;
pub mod output;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use varguard_lint::{LintReport, Rule};
use varguard_resolve::ImportSource;

pub use config::Config;
pub use output::{render, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "varguard")]
#[command(version, about = "Report var() references to unknown CSS custom properties", long_about = None)]
pub struct Args {
    /// Stylesheets to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// JSON config file (default: ./varguard.json if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Extra custom property source, applied after configured sources
    #[arg(long = "import-from", value_name = "SRC")]
    pub import_from: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Raise log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// 未设置 `RUST_LOG` 时使用的日志级别
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reports: Vec<LintReport>,
}

impl Outcome {
    /// 有任何诊断（包括配置错误）时为 true
    pub fn has_problems(&self) -> bool {
        self.reports.iter().any(|report| !report.is_clean())
    }
}

/// 按参数检查所有文件
///
/// `cwd` 用于查找默认配置文件。读不了的配置或输入文件是致命错误
pub async fn run(args: &Args, cwd: &Path) -> Result<Outcome> {
    let config = Config::load(args.config.as_deref(), cwd).await?;

    let extra = args
        .import_from
        .iter()
        .map(|source| ImportSource::from(source.as_str()))
        .collect();
    let rule = Rule::with_sources(&config.rule, &config.options, extra);

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let source = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let report = rule
            .lint_source(&source, Some(path))
            .await
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            diagnostics = report.diagnostics.len(),
            "checked stylesheet"
        );
        reports.push(report);
    }

    Ok(Outcome { reports })
}

/// 运行并输出，返回退出码：0 无问题，1 有诊断
pub async fn run_and_render<W: Write>(args: &Args, cwd: &Path, out: &mut W) -> Result<u8> {
    let outcome = run(args, cwd).await?;
    render(&outcome.reports, args.format, out).context("failed to write output")?;
    Ok(if outcome.has_problems() { 1 } else { 0 })
}
