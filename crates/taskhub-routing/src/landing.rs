//! Per-role landing pages

use serde::{Deserialize, Serialize};
use taskhub_access::Role;

/// Default landing page for every role
pub const DEFAULT_LANDING_PAGE: &str = "/dashboard";

/// Where each role lands after login or a denied navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingPages {
    /// System admin landing page
    pub system_admin: String,
    /// Agency admin landing page
    pub agency_admin: String,
    /// Client admin landing page
    pub client_admin: String,
    /// Client user landing page
    pub client_user: String,
}

impl Default for LandingPages {
    fn default() -> Self {
        Self::uniform(DEFAULT_LANDING_PAGE)
    }
}

impl LandingPages {
    /// Same page for every role
    #[must_use]
    pub fn uniform(href: &str) -> Self {
        Self {
            system_admin: href.to_string(),
            agency_admin: href.to_string(),
            client_admin: href.to_string(),
            client_user: href.to_string(),
        }
    }

    /// Landing page of a role
    #[inline]
    #[must_use]
    pub fn for_role(&self, role: Role) -> &str {
        match role {
            Role::SystemAdmin => &self.system_admin,
            Role::AgencyAdmin => &self.agency_admin,
            Role::ClientAdmin => &self.client_admin,
            Role::ClientUser => &self.client_user,
        }
    }
}
