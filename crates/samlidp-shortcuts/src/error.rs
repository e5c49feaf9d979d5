//! Error types for the shortcuts crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use samlidp_store::StoreError;
use thiserror::Error;

/// Errors that can occur while serving shortcuts.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// Failed to start the server.
    #[error("failed to start server: {0}")]
    StartupFailed(String),

    /// The request body could not be understood.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No shortcut with this name.
    #[error("shortcut not found: {0}")]
    NotFound(String),

    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The IdP configuration lock was poisoned.
    #[error("IdP configuration lock poisoned")]
    LockPoisoned,

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShortcutError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShortcutError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            // Missing shortcuts look like any other failure so names cannot
            // be probed.
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ShortcutError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        // Detail stays in the log.
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
