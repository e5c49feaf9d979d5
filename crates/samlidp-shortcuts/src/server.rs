//! HTTP server for shortcuts and IdP-initiated logins.

use crate::engine::SamlEngine;
use crate::error::ShortcutError;
use crate::routes;
use crate::state::AppState;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// The shortcut server.
pub struct ShortcutServer<E> {
    bind: String,
    state: AppState<E>,
}

impl<E: SamlEngine + 'static> ShortcutServer<E> {
    pub fn new(bind: impl Into<String>, state: AppState<E>) -> Self {
        Self {
            bind: bind.into(),
            state,
        }
    }

    /// The configured bind address.
    pub fn bind(&self) -> &str {
        &self.bind
    }

    /// Serve until `shutdown` resolves.
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ShortcutError> {
        let app = routes::create_router(self.state).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&self.bind).await.map_err(|e| {
            ShortcutError::StartupFailed(format!("failed to bind to {}: {e}", self.bind))
        })?;

        tracing::info!(address = %self.bind, "samlidp listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ShortcutError::Internal(e.to_string()))?;

        Ok(())
    }
}
