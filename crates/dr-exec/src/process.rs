//! Process spawning shared by the git and dbt implementations.

use std::path::Path;
use std::process::Output;
use tokio::process::Command;

use crate::error::{ExecError, ExecResult};
use crate::traits::CommandOutcome;

/// Run a program to completion and return its captured output.
pub(crate) async fn capture(program: &str, args: &[String], cwd: &Path) -> ExecResult<Output> {
    log::debug!("Running {} {} in {}", program, args.join(" "), cwd.display());
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ExecError::Spawn {
            program: program.to_string(),
            source: e,
        })
}

/// Decode stdout as UTF-8.
pub(crate) fn stdout_text(program: &str, output: &Output) -> ExecResult<String> {
    String::from_utf8(output.stdout.clone()).map_err(|_| ExecError::InvalidOutput {
        program: program.to_string(),
    })
}

pub(crate) fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Run a program and write its stdout and stderr to `log_path`.
pub(crate) async fn run_logged(
    program: &str,
    args: &[String],
    cwd: &Path,
    log_path: &Path,
) -> ExecResult<CommandOutcome> {
    let output = capture(program, args, cwd).await?;

    let mut log = format!("$ {} {}\n", program, args.join(" "));
    log.push_str("\n--- stdout ---\n");
    log.push_str(&String::from_utf8_lossy(&output.stdout));
    log.push_str("\n--- stderr ---\n");
    log.push_str(&String::from_utf8_lossy(&output.stderr));
    log.push_str(&format!("\n--- exit: {} ---\n", output.status));
    write_log(log_path, &log)?;

    Ok(CommandOutcome {
        success: output.status.success(),
        exit_code: output.status.code(),
        log_path: log_path.to_path_buf(),
    })
}

fn write_log(path: &Path, content: &str) -> ExecResult<()> {
    let to_err = |e| ExecError::LogFile {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    std::fs::write(path, content).map_err(to_err)
}
