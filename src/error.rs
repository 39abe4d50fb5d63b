//! Error types for willitconnect
//!
//! Every failure class of a check is a [`WicError`] variant whose `Display`
//! output is the exact message printed to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Usage string printed when the host or port is missing
pub const USAGE: &str = "Usage: cf willitconnect <host> <port>";

/// Main error type for a connectivity check
#[derive(Error, Debug)]
pub enum WicError {
    /// Fewer than two positional arguments
    #[error("Usage: cf willitconnect <host> <port>")]
    Usage,

    /// The session has no logged-in user or targeted organization
    #[error("Unable to connect to CF, use cf login first")]
    NotLoggedIn {
        #[source]
        source: SessionError,
    },

    /// The targeted organization could not be resolved
    #[error("Unable to find valid org, please view cf target")]
    OrgNotFound {
        org: String,
        #[source]
        source: SessionError,
    },

    /// The organization has no usable first domain
    #[error("Unable to find valid domain, please view cf domains")]
    DomainNotFound { org: String },

    /// The willitconnect service could not be reached
    #[error("Unable to access willitconnect: {detail}")]
    Unreachable {
        url: String,
        detail: String,
        #[source]
        source: reqwest::Error,
    },

    /// The willitconnect service replied with something we cannot decode
    #[error("Invalid response from willitconnect: {source}")]
    InvalidResponse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Writing the report failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl WicError {
    /// Create a login error from the underlying session failure
    pub fn not_logged_in(source: SessionError) -> Self {
        Self::NotLoggedIn { source }
    }

    /// Create an organization lookup error
    pub fn org_not_found(org: impl Into<String>, source: SessionError) -> Self {
        Self::OrgNotFound {
            org: org.into(),
            source,
        }
    }

    /// Create a missing domain error
    pub fn domain_not_found(org: impl Into<String>) -> Self {
        Self::DomainNotFound { org: org.into() }
    }

    /// Create a transport error, flattening the reqwest error chain into
    /// the printed detail
    pub fn unreachable(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Unreachable {
            url: url.into(),
            detail: error_chain(&source),
            source,
        }
    }

    /// Create a decode error
    pub fn invalid_response<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidResponse {
            source: Box::new(source),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with its cause
    pub fn config_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Process exit code for this failure class
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Usage => 2,
            Self::NotLoggedIn { .. } => 3,
            Self::OrgNotFound { .. } => 4,
            Self::DomainNotFound { .. } => 5,
            Self::Unreachable { .. } => 6,
            Self::InvalidResponse { .. } => 7,
            Self::Config { .. } | Self::Output(_) => 1,
        }
    }
}

/// Errors raised while querying the CF session
#[derive(Error, Debug)]
pub enum SessionError {
    /// No CF CLI configuration file could be located
    #[error("CF configuration not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The CF CLI configuration file is not valid JSON
    #[error("CF configuration is invalid: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No access token in the configuration
    #[error("Not logged in")]
    NotLoggedIn,

    /// Logged in but no organization is targeted
    #[error("No organization targeted")]
    NoOrgTargeted,

    /// The CF API has no organization with this name
    #[error("Organization not found: {name}")]
    OrgNotFound { name: String },

    /// The CF API answered with an error document
    #[error("CF API error on {path}: {message}")]
    Api { path: String, message: String },

    /// The CF API answered with something that is not the expected JSON
    #[error("Unexpected CF API response on {path}")]
    ApiDecode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Running the CF CLI failed
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Errors raised while running an external command
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The command could not be started
    #[error("Failed to execute {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully
    #[error("{command} failed with exit code {exit_code:?}: {stderr}")]
    Failed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

/// Render an error and all of its sources as `outer: inner: root`
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let cause_text = cause.to_string();
        if !rendered.ends_with(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        current = cause.source();
    }
    rendered
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, WicError>;
