//! Core functionality
//!
//! Contains the command handler, the connectivity checker and the CF session
//! it draws its context from.

pub mod cf_session;
pub mod checker;
pub mod handler;
pub mod session;

pub use cf_session::CfCliSession;
pub use checker::{CheckRequest, CheckResponse, ConnectivityCheck, HttpChecker, Verdict};
pub use handler::{CommandHandler, InvocationRequest};
pub use session::{Domain, Organization, OrganizationDetails, Session};
