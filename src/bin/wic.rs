//! Short alias for `willitconnect`
use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    willitconnect::run()
}
