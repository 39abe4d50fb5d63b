//! Utility modules for common functionality
//!
//! Provides process execution and CF environment lookup.

pub mod env;
pub mod process;

pub use env::{cf_config_path, resolve_cf_home};
pub use process::ProcessRunner;
