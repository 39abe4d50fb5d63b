//! Command implementation for the CLI

use crate::{
    config::Config,
    core::{CfCliSession, CommandHandler, HttpChecker},
    error::{WicError, error_chain},
};
use std::{io::Write, process::ExitCode};
use tracing::{debug, instrument};

/// Execute a connectivity check and report the outcome on stdout
#[instrument(skip(config))]
pub fn execute_command(config: &Config, target: &[String]) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = HttpChecker::new(&config.http).and_then(|checker| {
        let session = CfCliSession::new(&config.cf, config.debug);
        CommandHandler::new(&session, &checker).run(target, &mut out)
    });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err, &mut out),
    }
}

/// Print a failure the way users expect it and pick its exit code
pub fn report_failure<W: Write>(err: &WicError, out: &mut W) -> ExitCode {
    debug!("Check failed: {}", error_chain(err));

    if let Err(write_err) = writeln!(out, "{err}") {
        eprintln!("{err} ({write_err})");
    }

    ExitCode::from(err.exit_code())
}
