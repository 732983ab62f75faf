//! The refresh command: wire the real collaborators into the pipeline and
//! turn its terminal status into an exit code.

mod audit;
mod execute;
mod options;
mod pipeline;

use anyhow::{Context, Result};
use dr_core::{DbtProject, FileReportSink, ReportStatus, ReportWriter, RunReport};
use dr_exec::{DbtCli, GitCli};
use std::path::Path;

use crate::cli::Cli;
use crate::common::ExitCode;

use options::{OutputPaths, RefreshOptions};
use pipeline::Pipeline;

/// Execute a refresh run
pub(crate) async fn execute(cli: &Cli) -> Result<()> {
    let paths = OutputPaths::resolve(cli);
    let sink = FileReportSink::new(&paths.report_path);
    let mut writer = ReportWriter::start(cli.refresh.dry_run, &sink).with_context(|| {
        format!(
            "Failed to write run report to {}",
            paths.report_path.display()
        )
    })?;

    if cli.global.verbose {
        eprintln!("[verbose] Run report: {}", paths.report_path.display());
        eprintln!("[verbose] Command logs: {}", paths.log_dir.display());
    }

    let project_dir = Path::new(&cli.global.project_dir);
    let status = match DbtProject::load_from_dir(project_dir) {
        Ok(project) => {
            let opts = RefreshOptions::resolve(cli, &project);
            let vcs = GitCli::new(&cli.global.git_executable, &opts.project_dir);
            let dbt = DbtCli::new(&cli.global.dbt_executable, &opts.project_dir, &paths.log_dir);
            Pipeline::new(&opts, &vcs, &dbt).run(&mut writer).await
        }
        Err(err) => {
            log::error!("{}", err);
            if let Err(persist) = writer.fail(&err) {
                log::error!("Failed to finalize run report: {}", persist);
            }
            ReportStatus::Failed
        }
    };

    print_summary(writer.report(), sink.path());

    match exit_code_for(status) {
        0 => Ok(()),
        code => Err(ExitCode(code).into()),
    }
}

/// Completed and skipped runs succeed; error and failed runs exit 1.
fn exit_code_for(status: ReportStatus) -> i32 {
    match status {
        ReportStatus::Completed | ReportStatus::Skipped => 0,
        ReportStatus::Starting | ReportStatus::Error | ReportStatus::Failed => 1,
    }
}

fn print_summary(report: &RunReport, report_path: &Path) {
    println!();
    println!(
        "Run started {}",
        report.execution_time().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Changed model files: {}", report.changed_files().len());
    if !report.incremental_models().is_empty() {
        let names: Vec<&str> = report
            .incremental_models()
            .iter()
            .map(|m| m.as_str())
            .collect();
        println!("Incremental models: {}", names.join(", "));
    }
    for command in report.refresh_commands() {
        println!("  {}", command);
    }
    if report.dry_run() {
        println!("Dry run: no dbt command was executed");
    }
    match report.message() {
        Some(message) => println!("Status: {} - {}", report.status(), message),
        None => println!("Status: {}", report.status()),
    }
    println!("Report: {}", report_path.display());
}
