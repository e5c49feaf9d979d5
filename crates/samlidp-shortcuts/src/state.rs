//! Shared application state.

use crate::engine::{SamlEngine, SharedIdp};
use crate::registry::ShortcutRegistry;
use crate::resolver::FlowResolver;
use samlidp_store::KeyValueStore;
use std::sync::Arc;

/// State shared by all handlers.
pub struct AppState<E> {
    inner: Arc<AppStateInner<E>>,
}

struct AppStateInner<E> {
    registry: ShortcutRegistry,
    resolver: FlowResolver<E>,
}

impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: SamlEngine> AppState<E> {
    /// Create state over a store and a shared engine.
    pub fn new(store: Arc<dyn KeyValueStore>, idp: Arc<SharedIdp<E>>) -> Self {
        let registry = ShortcutRegistry::new(store);
        let resolver = FlowResolver::new(registry.clone(), idp);
        Self {
            inner: Arc::new(AppStateInner { registry, resolver }),
        }
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.inner.registry
    }

    pub fn resolver(&self) -> &FlowResolver<E> {
        &self.inner.resolver
    }

    /// The shared engine, for reconfiguration.
    pub fn idp(&self) -> &Arc<SharedIdp<E>> {
        self.inner.resolver.idp()
    }
}
