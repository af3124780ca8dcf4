// src/main.rs

use std::process::ExitCode;

use doo::errors::DooError;
use doo::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("doo: {err}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

/// Terminal failures the user caused (a validation bundle, an unmatched
/// query, a deadlock) print as plain messages; anything else keeps its
/// context chain so config and subprocess problems stay diagnosable.
fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<DooError>() {
        Some(user_err) => eprintln!("doo: {user_err}"),
        None => eprintln!("doo: {err:#}"),
    }
}
