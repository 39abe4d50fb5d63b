#![allow(clippy::cargo_common_metadata)]
use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    willitconnect::run()
}
