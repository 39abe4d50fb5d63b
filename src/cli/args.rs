//! Command-line argument parsing

use crate::config::DEFAULT_TIMEOUT_SECS;
use clap::Parser;
use std::path::PathBuf;

/// Validates connectivity between CF and a target
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(name = "willitconnect")]
#[command(override_usage = "willitconnect [OPTIONS] <host> <port>")]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Request timeout for the connectivity check, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Ignore proxy environment variables for the connectivity check
    #[arg(long)]
    pub no_proxy: bool,

    /// Directory containing the CF CLI `.cf/config.json`
    #[arg(long, env = "CF_HOME", value_name = "DIR")]
    pub cf_home: Option<PathBuf>,

    /// CF CLI executable used to look up organization domains
    #[arg(long, value_name = "PATH", default_value = "cf")]
    pub cf_binary: String,

    /// Target host followed by target port
    #[arg(value_name = "HOST PORT")]
    pub target: Vec<String>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
