//! Session context the check runs in
//!
//! The handler only needs to know which organization is targeted and which
//! domains it owns. [`Session`] is that seam; [`super::cf_session::CfCliSession`]
//! is the implementation backed by the CF CLI.

use crate::error::SessionError;

/// Organization currently targeted by the CF CLI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Organization {
    pub name: String,
    pub guid: String,
}

/// A domain owned by or shared with an organization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domain {
    pub name: String,
}

/// Organization with its ordered domain list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrganizationDetails {
    pub name: String,
    pub guid: String,
    pub domains: Vec<Domain>,
}

impl OrganizationDetails {
    /// Name of the first domain, if there is one and it is not empty
    #[must_use]
    pub fn base_domain(&self) -> Option<&str> {
        self.domains
            .first()
            .map(|domain| domain.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Access to the user's CF session
pub trait Session {
    /// Organization the user is currently targeting
    fn current_organization(&self) -> Result<Organization, SessionError>;

    /// Full details, including domains, of the organization called `name`
    fn organization_details(&self, name: &str) -> Result<OrganizationDetails, SessionError>;
}
