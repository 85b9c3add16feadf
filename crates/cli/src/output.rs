use std::io::{self, Write};

use clap::ValueEnum;
use varguard_core::Severity;
use varguard_lint::LintReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// 输出所有报告
pub fn render<W: Write>(reports: &[LintReport], format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Human => render_human(reports, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)
        }
    }
}

/// `path:line:column  severity  message  rule`，每条诊断一行
fn render_human<W: Write>(reports: &[LintReport], out: &mut W) -> io::Result<()> {
    let mut total = 0;

    for report in reports {
        let origin = report
            .origin
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<input>".to_string());

        for diagnostic in &report.diagnostics {
            let severity = match diagnostic.severity {
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            writeln!(
                out,
                "{}:{}:{}  {}  {}  {}",
                origin,
                diagnostic.location.line,
                diagnostic.location.column,
                severity,
                diagnostic.message,
                diagnostic.rule
            )?;
            total += 1;
        }
    }

    if total > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "{} problem{}",
            total,
            if total == 1 { "" } else { "s" }
        )?;
    }

    Ok(())
}
