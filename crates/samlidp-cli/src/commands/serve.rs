//! `samlidp serve` - Start the shortcut and login server.
//!
//! On unix, SIGHUP re-reads the configuration file and points the engine at
//! the new `idp.upstream_url`. Logins in flight finish against the old value.

use super::load_config;
use anyhow::Context;
use samlidp_core::{ConfigError, SamlIdpConfig};
use samlidp_shortcuts::{AppState, SharedIdp, ShortcutServer, UpstreamRedirectEngine};
use samlidp_store::create_store;
use std::path::Path;
use std::sync::Arc;

pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let engine = upstream_engine(&config)?;
    let store = create_store(&config.store).context("Failed to open shortcut store")?;

    tracing::info!(
        config = %config_path.display(),
        backend = ?config.store.backend,
        upstream = %engine.upstream(),
        "Starting samlidp"
    );

    let idp = Arc::new(SharedIdp::new(engine));
    let state = AppState::new(store, idp.clone());

    #[cfg(unix)]
    tokio::spawn(reload_on_hangup(config_path.to_path_buf(), idp));

    ShortcutServer::new(config.server.bind, state)
        .run(shutdown_signal())
        .await?;

    tracing::info!("samlidp stopped");
    Ok(())
}

/// The engine described by the `[idp]` section.
pub fn upstream_engine(config: &SamlIdpConfig) -> anyhow::Result<UpstreamRedirectEngine> {
    let upstream = config
        .idp
        .upstream_url
        .as_deref()
        .ok_or(ConfigError::Missing("idp.upstream_url"))?;
    UpstreamRedirectEngine::parse(upstream)
        .with_context(|| format!("Invalid idp.upstream_url: {upstream}"))
}

/// Re-read the configuration file and swap in its upstream URL.
pub fn reload_upstream(
    config_path: &Path,
    idp: &SharedIdp<UpstreamRedirectEngine>,
) -> anyhow::Result<()> {
    let upstream = upstream_engine(&load_config(config_path)?)?
        .upstream()
        .clone();

    tracing::info!(upstream = %upstream, "Reloading IdP configuration");
    idp.reconfigure(|engine| engine.set_upstream(upstream))?;
    Ok(())
}

#[cfg(unix)]
async fn reload_on_hangup(
    config_path: std::path::PathBuf,
    idp: Arc<SharedIdp<UpstreamRedirectEngine>>,
) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::warn!(error = %err, "Cannot listen for SIGHUP; reload disabled");
            return;
        }
    };

    while hangups.recv().await.is_some() {
        if let Err(err) = reload_upstream(&config_path, &idp) {
            tracing::error!(error = %format!("{err:#}"), "Failed to reload configuration");
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
