//! Tracked-request token commands.
//!
//! `samlidp token encode` - Sign a tracked request.
//! `samlidp token decode` - Verify a token and print its request.

use super::load_config;
use anyhow::Context;
use samlidp_core::{SamlIdpConfig, TrackedRequest};
use samlidp_tracker::{JwtTrackedRequestCodec, KeyPair, TrackedRequestCodec, TrackerConfig};
use std::path::Path;

/// Resolve the signing key: an explicit file wins over the configured one.
fn resolve_keypair(config: &SamlIdpConfig, key: Option<&Path>) -> anyhow::Result<KeyPair> {
    if let Some(path) = key {
        return KeyPair::load_from_file(path)
            .with_context(|| format!("Failed to load private key from {}", path.display()));
    }

    let pem = config.tracker.resolve_private_key()?.context(
        "Tracker private key not provided. Pass --key <path>, or set tracker.private_key_env \
         or tracker.private_key_file",
    )?;
    KeyPair::from_private_key_pem(&pem).context("Failed to parse tracker private key")
}

/// Build the codec described by the `[tracker]` section.
pub fn build_codec(
    config: &SamlIdpConfig,
    key: Option<&Path>,
) -> anyhow::Result<JwtTrackedRequestCodec> {
    let tracker = TrackerConfig::from_file(&config.tracker)?;
    let keypair = resolve_keypair(config, key)?;
    Ok(JwtTrackedRequestCodec::new(tracker, keypair)?)
}

pub fn encode(
    config_path: &Path,
    key: Option<&Path>,
    index: &str,
    id: &str,
    uri: &str,
) -> anyhow::Result<()> {
    let codec = build_codec(&load_config(config_path)?, key)?;
    let token = codec.encode(&TrackedRequest::new(index, id, uri))?;
    println!("{token}");
    Ok(())
}

pub fn decode(config_path: &Path, key: Option<&Path>, token: &str) -> anyhow::Result<()> {
    let codec = build_codec(&load_config(config_path)?, key)?;
    let request = codec
        .decode(token.trim())
        .context("Token rejected")?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
