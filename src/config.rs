//! Configuration management for willitconnect
//!
//! Centralizes configuration options and provides validation.

use crate::{cli::Args, error::WicError};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Connectivity check HTTP configuration
    pub http: HttpConfig,
    /// CF CLI session configuration
    pub cf: CfConfig,
}

/// HTTP client configuration for the willitconnect request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout
    pub timeout: Duration,
    /// Honor HTTP(S)_PROXY and friends
    pub use_system_proxy: bool,
    /// User-Agent header sent with the check
    pub user_agent: String,
}

/// CF CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfConfig {
    /// CF CLI executable
    pub binary: String,
    /// Directory holding `.cf/config.json`; `None` means the user's home
    pub home: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            http: HttpConfig::default(),
            cf: CfConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_system_proxy: true,
            user_agent: format!("cf-willitconnect/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for CfConfig {
    fn default() -> Self {
        Self {
            binary: "cf".to_string(),
            home: None,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, WicError> {
        let config = Self {
            debug: args.debug,
            http: HttpConfig {
                timeout: Duration::from_secs(args.timeout),
                use_system_proxy: !args.no_proxy,
                ..HttpConfig::default()
            },
            cf: CfConfig {
                binary: args.cf_binary.clone(),
                home: args.cf_home.clone(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), WicError> {
        if self.http.timeout.is_zero() {
            return Err(WicError::config("timeout must be greater than zero"));
        }

        if self.cf.binary.trim().is_empty() {
            return Err(WicError::config("CF CLI binary must not be empty"));
        }

        Ok(())
    }
}
