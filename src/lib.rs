//! # willitconnect
//!
//! Checks whether a host and port are reachable from inside a Cloud Foundry
//! network. The check itself runs on a willitconnect service deployed at
//! `willitconnect.<org domain>`; this crate finds that service through the
//! CF CLI session, posts the target to it and prints the verdict.
//!
//! ## Example
//!
//! ```no_run
//! use willitconnect::{
//!     config::Config,
//!     core::{CfCliSession, CommandHandler, HttpChecker},
//! };
//!
//! let config = Config::default();
//! let session = CfCliSession::new(&config.cf, config.debug);
//! let checker = HttpChecker::new(&config.http)?;
//! let target = vec!["10.0.0.1".to_string(), "443".to_string()];
//!
//! let verdict = CommandHandler::new(&session, &checker).run(&target, &mut std::io::stdout())?;
//! println!("{verdict:?}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity.
///
/// Logs go to stderr; stdout is reserved for the check report.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Entry point shared by the `willitconnect` and `wic` binaries
pub fn run() -> Result<ExitCode> {
    // Parse command line arguments
    let args = cli::parse_args();

    // Setup logging based on debug flag
    setup_logging(args.debug)?;

    // Initialize configuration
    let config = config::Config::from_args(&args)?;

    // Run the check
    Ok(cli::execute_command(&config, &args.target))
}
