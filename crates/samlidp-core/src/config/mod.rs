//! Configuration types for the samlidp service.
//!
//! Configuration is loaded from a single TOML file (`samlidp.toml` by
//! default) into [`SamlIdpConfig`]. Every section has defaults, so an empty
//! file yields a server with an in-memory store.

pub mod idp;
pub mod server;
pub mod store;
pub mod tracker;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub use idp::IdpConfig;
pub use server::ServerConfig;
pub use store::{StorageBackend, StoreConfig};
pub use tracker::TrackerConfigFile;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file or a referenced key file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A duration field could not be parsed.
    #[error("invalid duration for {field}: {value:?}")]
    InvalidDuration { field: &'static str, value: String },

    /// A required value is missing.
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
}

/// Complete samlidp configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamlIdpConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Shortcut store backend.
    #[serde(default)]
    pub store: StoreConfig,

    /// Upstream SAML engine used for IdP-initiated logins.
    #[serde(default)]
    pub idp: IdpConfig,

    /// Tracked-request token settings.
    #[serde(default)]
    pub tracker: TrackerConfigFile,
}

impl SamlIdpConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

pub(crate) fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|_| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SamlIdpConfig::from_toml("").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.store.backend, StorageBackend::Memory);
        assert!(config.idp.upstream_url.is_none());
        assert_eq!(config.tracker.max_age().unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn test_full_config() {
        let raw = r#"
            [server]
            bind = "127.0.0.1:9000"

            [store]
            backend = "file"
            file_path = "/var/lib/samlidp/shortcuts.json"

            [idp]
            upstream_url = "https://idp.example.com/saml/idp-initiated"

            [tracker]
            url = "https://sp.example.com/saml"
            max_age = "2m"
            not_before_leeway = "10s"
            expiry_leeway = "1s"
            private_key_file = "keys/tracker.pem"
        "#;
        let config = SamlIdpConfig::from_toml(raw).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.store.backend, StorageBackend::File);
        assert_eq!(
            config.store.file_path.as_deref(),
            Some("/var/lib/samlidp/shortcuts.json")
        );
        assert_eq!(
            config.idp.upstream_url.as_deref(),
            Some("https://idp.example.com/saml/idp-initiated")
        );
        assert_eq!(config.tracker.max_age().unwrap(), Duration::from_secs(120));
        assert_eq!(
            config.tracker.not_before_leeway().unwrap(),
            Duration::from_secs(10)
        );
        assert_eq!(config.tracker.expiry_leeway().unwrap(), Duration::from_secs(1));
        assert_eq!(
            config.tracker.audience().as_deref(),
            Some("https://sp.example.com/saml")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"127.0.0.1:1234\"").unwrap();

        let config = SamlIdpConfig::load(file.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:1234");
    }

    #[test]
    fn test_load_missing_file() {
        let err = SamlIdpConfig::load(Path::new("/nonexistent/samlidp.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_duration() {
        let config = SamlIdpConfig::from_toml("[tracker]\nmax_age = \"soon\"").unwrap();
        assert!(matches!(
            config.tracker.max_age(),
            Err(ConfigError::InvalidDuration { field: "max_age", .. })
        ));
    }
}
