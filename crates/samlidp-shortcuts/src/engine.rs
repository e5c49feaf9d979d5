//! The SAML engine seam and its shared configuration lock.

use crate::error::ShortcutError;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::RwLock;
use url::Url;

/// The IdP-initiated entry point of a SAML engine.
///
/// The engine owns everything SAML: assertion building, signing, metadata.
/// It produces the full HTTP response for the user agent.
pub trait SamlEngine: Send + Sync {
    fn serve_idp_initiated(&self, service_provider_id: &str, relay_state: &str) -> Response;
}

/// Hands the flow to an upstream SAML engine.
///
/// The user agent is redirected to the upstream IdP-initiated endpoint with
/// `sp` and `RelayState` query parameters.
#[derive(Debug, Clone)]
pub struct UpstreamRedirectEngine {
    upstream: Url,
}

impl UpstreamRedirectEngine {
    pub fn new(upstream: Url) -> Self {
        Self { upstream }
    }

    pub fn parse(upstream: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(upstream)?))
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    /// Point at a different upstream endpoint.
    pub fn set_upstream(&mut self, upstream: Url) {
        self.upstream = upstream;
    }

    /// The redirect target for one login.
    pub fn redirect_url(&self, service_provider_id: &str, relay_state: &str) -> Url {
        let mut url = self.upstream.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("sp", service_provider_id);
            if !relay_state.is_empty() {
                query.append_pair("RelayState", relay_state);
            }
        }
        url
    }
}

impl SamlEngine for UpstreamRedirectEngine {
    fn serve_idp_initiated(&self, service_provider_id: &str, relay_state: &str) -> Response {
        let target = self.redirect_url(service_provider_id, relay_state);
        tracing::debug!(
            service_provider = %service_provider_id,
            target = %target,
            "Redirecting to upstream IdP"
        );
        Redirect::to(target.as_str()).into_response()
    }
}

/// A SAML engine shared between login requests and reconfiguration.
///
/// Logins hold the read lock for the duration of the engine call;
/// [`SharedIdp::reconfigure`] holds the write lock, so a login never sees a
/// half-applied configuration.
#[derive(Debug)]
pub struct SharedIdp<E> {
    engine: RwLock<E>,
}

impl<E: SamlEngine> SharedIdp<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: RwLock::new(engine),
        }
    }

    /// Run an IdP-initiated login under the read lock.
    pub fn serve_idp_initiated(
        &self,
        service_provider_id: &str,
        relay_state: &str,
    ) -> Result<Response, ShortcutError> {
        let engine = self
            .engine
            .read()
            .map_err(|_| ShortcutError::LockPoisoned)?;
        Ok(engine.serve_idp_initiated(service_provider_id, relay_state))
    }

    /// Mutate the engine configuration under the write lock.
    pub fn reconfigure<R>(&self, update: impl FnOnce(&mut E) -> R) -> Result<R, ShortcutError> {
        let mut engine = self
            .engine
            .write()
            .map_err(|_| ShortcutError::LockPoisoned)?;
        Ok(update(&mut engine))
    }
}
