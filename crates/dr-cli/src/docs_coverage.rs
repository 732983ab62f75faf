//! Docs-coverage command: fail when too few model columns are documented.

use anyhow::{Context, Result};
use dr_core::{
    discover_coverage_paths, CoreError, CoreResult, CoverageReport, CoverageSummary,
    CoverageThreshold, DbtProject, GapSeverity, ModelDirs,
};
use dr_exec::{CoverageTool, DbtCoverageCli};
use std::path::{Path, PathBuf};

use crate::cli::{DocsCoverageArgs, GlobalArgs};
use crate::common::{exec_failure, log_dir, non_blank, ExitCode};

/// Report file name used when no output path is given.
const DEFAULT_COVERAGE_FILE: &str = "documentation_coverage.json";

/// Execute the docs-coverage command
pub(crate) async fn execute(args: &DocsCoverageArgs, global: &GlobalArgs) -> Result<()> {
    let threshold = CoverageThreshold::new(args.threshold)?;
    let project_dir = Path::new(&global.project_dir);
    let project = DbtProject::load_from_dir(project_dir)?;
    let dirs = if args.model_paths.is_empty() {
        ModelDirs::new(&project.model_paths)
    } else {
        ModelDirs::new(&args.model_paths)
    };

    let log_dir = log_dir(global);
    let report_path = absolute(
        non_blank(args.output.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| log_dir.join(DEFAULT_COVERAGE_FILE)),
    )?;

    if global.verbose {
        eprintln!("[verbose] Coverage report: {}", report_path.display());
    }

    let tool = DbtCoverageCli::new(&args.coverage_executable, project_dir, &log_dir);
    let summary = match check_coverage(&tool, project_dir, &dirs, threshold, &report_path).await {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("{}", err);
            return Err(ExitCode(1).into());
        }
    };

    print_summary(&summary);
    if summary.passes() {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

/// dbt-coverage runs from the project directory, so hand it an absolute
/// report path to read back from here.
fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(path))
}

/// Run the coverage tool over the model subdirectories and analyze its report.
///
/// Coverage below the threshold makes the tool exit non-zero; the report it
/// still writes is what decides the verdict.
async fn check_coverage(
    tool: &dyn CoverageTool,
    project_dir: &Path,
    dirs: &ModelDirs,
    threshold: CoverageThreshold,
    report_path: &Path,
) -> CoreResult<CoverageSummary> {
    let model_paths = discover_coverage_paths(project_dir, dirs)?;
    if model_paths.is_empty() {
        return Err(CoreError::CoverageUnavailable {
            reason: format!(
                "no model subdirectories found under {}",
                dirs.as_slice().join(", ")
            ),
        });
    }
    println!("Checking documentation of {}", model_paths.join(", "));

    if report_path.exists() {
        std::fs::remove_file(report_path).map_err(|e| CoreError::IoWithPath {
            path: report_path.display().to_string(),
            source: e,
        })?;
    }

    let outcome = tool
        .compute_doc(&model_paths, threshold.value(), report_path)
        .await
        .map_err(|e| exec_failure("dbt-coverage compute doc", e))?;
    if !outcome.success {
        log::warn!(
            "dbt-coverage exited with {} (output: {})",
            outcome.status_description(),
            outcome.log_path.display()
        );
    }

    if !report_path.exists() {
        return Err(CoreError::CoverageUnavailable {
            reason: format!(
                "dbt-coverage wrote no report at '{}'; see {}",
                report_path.display(),
                outcome.log_path.display()
            ),
        });
    }

    let report = CoverageReport::load(report_path)?;
    Ok(CoverageSummary::analyze(&report, threshold))
}

fn print_summary(summary: &CoverageSummary) {
    println!();
    println!(
        "Documentation coverage: {}/{} columns ({:.1}%)",
        summary.covered,
        summary.total,
        summary.coverage * 100.0
    );

    if !summary.gaps.is_empty() {
        println!();
        println!("Models requiring documentation fixes:");
        for gap in &summary.gaps {
            println!(
                "  {}: {} ({:.1}%)",
                gap.severity,
                gap.model,
                gap.coverage * 100.0
            );
            for column in &gap.missing_columns {
                println!("    - {}", column);
            }
        }
        let critical = summary
            .gaps
            .iter()
            .filter(|g| g.severity == GapSeverity::Critical)
            .count();
        if critical > 0 {
            log::warn!("{} model(s) have no documented columns", critical);
        }
    }

    println!();
    if summary.passes() {
        println!(
            "Documentation coverage ({:.1}%) meets the threshold of {:.1}%",
            summary.coverage * 100.0,
            summary.threshold.percent()
        );
    } else {
        println!(
            "Documentation coverage ({:.1}%) is below the threshold of {:.1}%",
            summary.coverage * 100.0,
            summary.threshold.percent()
        );
    }
}

#[cfg(test)]
#[path = "docs_coverage_test.rs"]
mod tests;
