//! CLI command implementations.

pub mod check;
pub mod keys;
pub mod serve;
pub mod token;

use anyhow::Context;
use samlidp_core::SamlIdpConfig;
use std::path::Path;

/// Load the configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<SamlIdpConfig> {
    SamlIdpConfig::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}
