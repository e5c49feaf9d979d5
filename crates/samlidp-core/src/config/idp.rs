//! Upstream SAML engine configuration.

use serde::{Deserialize, Serialize};

/// Where IdP-initiated logins are handed off to.
///
/// This is the configuration guarded by the IdP read-write lock at runtime;
/// replacing it blocks new logins until the swap completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdpConfig {
    /// IdP-initiated endpoint of the SAML engine. It receives the service
    /// provider entity ID as `sp` and the relay state as `RelayState`.
    #[serde(default)]
    pub upstream_url: Option<String>,
}
