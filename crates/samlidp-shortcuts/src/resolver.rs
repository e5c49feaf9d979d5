//! Resolves a shortcut name into an IdP-initiated login.

use crate::engine::{SamlEngine, SharedIdp};
use crate::error::ShortcutError;
use crate::registry::ShortcutRegistry;
use axum::response::Response;
use std::sync::Arc;

/// Turns `/login/{shortcut}/{suffix}` into an engine call.
pub struct FlowResolver<E> {
    registry: ShortcutRegistry,
    idp: Arc<SharedIdp<E>>,
}

impl<E> Clone for FlowResolver<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            idp: self.idp.clone(),
        }
    }
}

impl<E: SamlEngine> FlowResolver<E> {
    pub fn new(registry: ShortcutRegistry, idp: Arc<SharedIdp<E>>) -> Self {
        Self { registry, idp }
    }

    /// Start the login flow behind shortcut `name`.
    ///
    /// Every lookup failure, including an unknown name, comes back as
    /// [`ShortcutError::Internal`].
    pub fn initiate(&self, name: &str, suffix: Option<&str>) -> Result<Response, ShortcutError> {
        let shortcut = self.registry.get(name).map_err(|err| {
            tracing::error!(shortcut = %name, error = %err, "Failed to look up shortcut");
            ShortcutError::Internal(format!("shortcut lookup failed: {name}"))
        })?;

        let relay_state = shortcut.relay_state_for(suffix);
        tracing::debug!(
            shortcut = %name,
            service_provider = %shortcut.service_provider_id,
            "Initiating IdP login"
        );

        self.idp
            .serve_idp_initiated(&shortcut.service_provider_id, &relay_state)
    }

    pub fn idp(&self) -> &Arc<SharedIdp<E>> {
        &self.idp
    }
}
