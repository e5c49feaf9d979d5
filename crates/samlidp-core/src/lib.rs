use serde::{Deserialize, Serialize};

// Configuration types shared across all samlidp crates
pub mod config;

pub use config::{
    ConfigError, IdpConfig, SamlIdpConfig, ServerConfig, StorageBackend, StoreConfig,
    TrackerConfigFile,
};

/// Store key prefix under which shortcuts live.
pub const SHORTCUTS_PREFIX: &str = "/shortcuts/";

/// Store key for the shortcut with the given name.
pub fn shortcut_key(name: &str) -> String {
    format!("{SHORTCUTS_PREFIX}{name}")
}

/// An IdP-initiated SAML flow.
///
/// When a user navigates to `/login/{shortcut}` the IdP starts a login to
/// the configured service provider with the relay state this shortcut
/// resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Name of the shortcut. The store key is authoritative; writes overwrite
    /// whatever the payload carries.
    #[serde(default)]
    pub name: String,

    /// Entity ID of the service provider, i.e.
    /// `https://someapp.example.com/saml/metadata`.
    #[serde(rename = "service_provider", default)]
    pub service_provider_id: String,

    /// Fixed relay state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_state: Option<String>,

    /// Use the URL suffix as relay state: `/login/myservice/foo` logs into
    /// `myservice` with relay state `foo`.
    #[serde(
        rename = "url_suffix_as_relay_state",
        default,
        skip_serializing_if = "is_false"
    )]
    pub uri_suffix_as_relay_state: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Shortcut {
    /// Create a shortcut pointing at a service provider.
    pub fn new(name: impl Into<String>, service_provider_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service_provider_id: service_provider_id.into(),
            relay_state: None,
            uri_suffix_as_relay_state: false,
        }
    }

    /// Set a fixed relay state.
    pub fn with_relay_state(mut self, relay_state: impl Into<String>) -> Self {
        self.relay_state = Some(relay_state.into());
        self
    }

    /// Take the relay state from the request path suffix.
    pub fn with_suffix_as_relay_state(mut self) -> Self {
        self.uri_suffix_as_relay_state = true;
        self
    }

    /// Relay state for a request carrying `suffix`.
    ///
    /// A literal relay state wins over the suffix; with neither the relay
    /// state is empty.
    pub fn relay_state_for(&self, suffix: Option<&str>) -> String {
        match (&self.relay_state, self.uri_suffix_as_relay_state) {
            (Some(fixed), _) => fixed.clone(),
            (None, true) => suffix.unwrap_or_default().to_string(),
            (None, false) => String::new(),
        }
    }
}

/// Correlation state for one in-flight authentication attempt.
///
/// There is no server-side record; the signed token handed to the browser
/// carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRequest {
    /// Unique identifier, carried as the token subject.
    #[serde(default)]
    pub index: String,

    /// ID of the AuthnRequest being tracked.
    #[serde(rename = "id", default)]
    pub saml_request_id: String,

    /// URI the user originally asked for.
    #[serde(default)]
    pub uri: String,
}

impl TrackedRequest {
    pub fn new(
        index: impl Into<String>,
        saml_request_id: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            saml_request_id: saml_request_id.into(),
            uri: uri.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_relay_state_wins_over_suffix() {
        let shortcut = Shortcut::new("app", "sp1")
            .with_relay_state("fixed")
            .with_suffix_as_relay_state();

        assert_eq!(shortcut.relay_state_for(Some("other")), "fixed");
    }

    #[test]
    fn test_suffix_relay_state() {
        let shortcut = Shortcut::new("app", "sp1").with_suffix_as_relay_state();

        assert_eq!(shortcut.relay_state_for(Some("foo/bar")), "foo/bar");
        assert_eq!(shortcut.relay_state_for(None), "");
    }

    #[test]
    fn test_suffix_ignored_without_flag() {
        let shortcut = Shortcut::new("app", "sp1");
        assert_eq!(shortcut.relay_state_for(Some("other")), "");
    }

    #[test]
    fn test_shortcut_json_field_names() {
        let shortcut = Shortcut::new("app", "https://sp.example.com/saml/metadata")
            .with_suffix_as_relay_state();
        let value = serde_json::to_value(&shortcut).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "name": "app",
                "service_provider": "https://sp.example.com/saml/metadata",
                "url_suffix_as_relay_state": true,
            })
        );
    }

    #[test]
    fn test_shortcut_minimal_body() {
        let shortcut: Shortcut =
            serde_json::from_str(r#"{"service_provider": "sp1"}"#).unwrap();
        assert_eq!(shortcut.name, "");
        assert_eq!(shortcut.service_provider_id, "sp1");
        assert!(shortcut.relay_state.is_none());
        assert!(!shortcut.uri_suffix_as_relay_state);
    }

    #[test]
    fn test_shortcut_key() {
        assert_eq!(shortcut_key("bob"), "/shortcuts/bob");
    }
}
