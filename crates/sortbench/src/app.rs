//! Application entry point and dispatch.

use std::io::{self, Write};

use anyhow::{Context, Result};

use sortbench_cli::{render_json, render_report, CLIProgressReporter};
use sortbench_core::{HostInfo, SweepConfig};
use sortbench_orchestration::{MatrixRunner, ProcessOrchestrator, SweepReport};

use crate::config::{AppConfig, OutputFormat};
use crate::errors::AppError;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        sortbench_cli::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    let sweep = config.to_sweep_config().map_err(AppError::from)?;
    tracing::debug!(?sweep, "configuration");

    let report = run_sweep(&sweep, config.narration_quiet());
    present(&report, config.format, &mut io::stdout().lock())?;

    if config.fail_on_missing && !report.is_complete() {
        return Err(AppError::Incomplete {
            missing: report.missing(),
        }
        .into());
    }
    Ok(())
}

/// Execute both passes against the real executable.
#[must_use]
pub fn run_sweep(sweep: &SweepConfig, quiet: bool) -> SweepReport {
    let orchestrator = ProcessOrchestrator::from_config(sweep);
    let reporter = CLIProgressReporter::new(quiet);
    MatrixRunner::new(&orchestrator, &reporter)
        .run(sweep)
        .with_host(HostInfo::collect())
}

/// Write the final report in the requested format.
pub fn present(report: &SweepReport, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Table => {
            writeln!(out)?;
            write!(out, "{}", render_report(report))?;
        }
        OutputFormat::Json => {
            let json = render_json(report).context("failed to serialize report")?;
            writeln!(out, "{json}")?;
        }
    }
    out.flush()?;
    Ok(())
}
