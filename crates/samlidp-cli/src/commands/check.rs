//! `samlidp check` command implementation.
//!
//! Loads the configuration the way `serve` would and reports what it found,
//! without binding a port.

use super::load_config;
use super::serve::upstream_engine;
use super::token::build_codec;
use anyhow::Context;
use samlidp_core::SamlIdpConfig;
use samlidp_store::{KeyValueStore, create_store};
use std::path::Path;

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    for line in check(&config)? {
        println!("✔ {line}");
    }
    println!();
    println!("Configuration {} is valid.", config_path.display());
    Ok(())
}

/// Validate every section, returning one summary line per section.
pub fn check(config: &SamlIdpConfig) -> anyhow::Result<Vec<String>> {
    let mut report = vec![format!("server: bind {}", config.server.bind)];

    let store = create_store(&config.store).context("Invalid [store] section")?;
    let shortcuts = store.list(samlidp_core::SHORTCUTS_PREFIX)?;
    report.push(format!(
        "store: {:?} backend, {} shortcut(s)",
        config.store.backend,
        shortcuts.len()
    ));

    let engine = upstream_engine(config)?;
    report.push(format!("idp: upstream {}", engine.upstream()));

    // The tracker is only needed by service providers minting tokens.
    if config.tracker.url.is_some() || config.tracker.audience.is_some() {
        let codec = build_codec(config, None).context("Invalid [tracker] section")?;
        report.push(format!(
            "tracker: {:?}, audience {}, max age {:?}",
            codec.config().algorithm,
            codec.config().audience,
            codec.config().max_age
        ));
    }

    Ok(report)
}
