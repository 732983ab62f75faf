//! Plan execution: run the refresh and the optional full build.

use dr_core::{CoreError, CoreResult, DbtCommand, RefreshPlan, ReportWriter};
use dr_exec::{BuildTool, CommandOutcome};

use super::pipeline::Stop;
use crate::common::exec_failure;

/// Log file step name for the combined full refresh.
pub(crate) const STEP_FULL_REFRESH: &str = "dbt_full_refresh";

/// Log file step name for the trailing full project build.
pub(crate) const STEP_BUILD_REST: &str = "dbt_build_rest";

/// Execute `plan` in order, recording each command before it runs.
///
/// In a dry run the commands are recorded and printed but never executed.
/// A failed refresh stops before the full build is attempted.
pub(crate) async fn execute_plan(
    dbt: &dyn BuildTool,
    plan: &RefreshPlan,
    dry_run: bool,
    writer: &mut ReportWriter<'_>,
) -> CoreResult<Stop> {
    let refresh = plan.refresh();
    let selector = refresh.selector().unwrap_or_default();

    writer.update(|r| r.record_command(refresh.to_string()))?;
    if dry_run {
        println!("[dry-run] Would run: {}", refresh);
    } else {
        let outcome = run_step(dbt, refresh, STEP_FULL_REFRESH).await?;
        if !outcome.success {
            return Err(CoreError::RefreshExecutionFailed {
                models: selector,
                status: outcome.status_description(),
                log_path: outcome.log_path.display().to_string(),
            });
        }
        println!("Full refresh succeeded for {}", selector);
    }

    let Some(rest) = plan.build_rest() else {
        log::info!("Skipping full project build (--build-rest not set)");
        return Ok(if dry_run {
            Stop::completed(format!("Dry run: planned full refresh of {}", selector))
        } else {
            Stop::completed(format!("Full refresh completed for {}", selector))
        });
    };

    writer.update(|r| r.record_command(rest.to_string()))?;
    if dry_run {
        println!("[dry-run] Would run: {}", rest);
        return Ok(Stop::completed(format!(
            "Dry run: planned full refresh of {} and a full project build",
            selector
        )));
    }

    let outcome = run_step(dbt, rest, STEP_BUILD_REST).await?;
    if !outcome.success {
        return Err(CoreError::FullBuildExecutionFailed {
            status: outcome.status_description(),
            log_path: outcome.log_path.display().to_string(),
        });
    }

    Ok(Stop::completed(format!(
        "Full refresh completed for {} and the full project build succeeded",
        selector
    )))
}

async fn run_step(dbt: &dyn BuildTool, command: &DbtCommand, step: &str) -> CoreResult<CommandOutcome> {
    dbt.run(command, step)
        .await
        .map_err(|e| exec_failure(&command.to_string(), e))
}
