//! dbt-refresh - full-refresh incremental dbt models whose SQL changed

use clap::error::{ContextKind, ErrorKind};
use clap::Parser;

mod cli;
mod common;
mod docs_coverage;
mod logging;
mod refresh;

use cli::{Cli, Commands};
use common::ExitCode;
use dr_core::CoreError;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return exit_status(report_parse_error(err)),
    };

    logging::init(cli.global.verbose);

    let result = match &cli.command {
        Some(Commands::DocsCoverage(args)) => docs_coverage::execute(args, &cli.global).await,
        None => refresh::execute(&cli).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(ec) => exit_status(ec.0),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::ExitCode::FAILURE
            }
        },
    }
}

/// Convert a numeric exit code into the process exit status.
fn exit_status(code: i32) -> std::process::ExitCode {
    std::process::ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Print a parse failure and pick the exit code.
///
/// `--help` and `--version` exit 0; everything else, unknown flags included,
/// exits 1 rather than clap's default of 2.
fn report_parse_error(err: clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            0
        }
        ErrorKind::UnknownArgument => {
            let flag = err
                .get(ContextKind::InvalidArg)
                .map(|v| v.to_string())
                .unwrap_or_default();
            eprintln!("{}", CoreError::UnknownFlag { flag });
            eprintln!("Run 'dbt-refresh --help' for usage.");
            1
        }
        _ => {
            let _ = err.print();
            1
        }
    }
}
