//! HTTP request handlers.

use crate::engine::SamlEngine;
use crate::error::ShortcutError;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use samlidp_core::Shortcut;
use serde::Serialize;
use serde_json::{Value, json};

/// Body of `GET /shortcuts/`.
#[derive(Debug, Serialize)]
pub struct ShortcutList {
    pub shortcuts: Vec<String>,
}

pub async fn list_shortcuts<E: SamlEngine>(
    State(state): State<AppState<E>>,
) -> Result<Json<ShortcutList>, ShortcutError> {
    let shortcuts = state.registry().list()?;
    Ok(Json(ShortcutList { shortcuts }))
}

pub async fn get_shortcut<E: SamlEngine>(
    State(state): State<AppState<E>>,
    Path(id): Path<String>,
) -> Result<Json<Shortcut>, ShortcutError> {
    Ok(Json(state.registry().get(&id)?))
}

/// The body is parsed by hand so every malformed payload is a 400.
pub async fn put_shortcut<E: SamlEngine>(
    State(state): State<AppState<E>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ShortcutError> {
    let shortcut: Shortcut = serde_json::from_slice(&body)
        .map_err(|e| ShortcutError::InvalidRequest(e.to_string()))?;
    state.registry().put(&id, shortcut)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_shortcut<E: SamlEngine>(
    State(state): State<AppState<E>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ShortcutError> {
    state.registry().delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn login<E: SamlEngine>(
    State(state): State<AppState<E>>,
    Path(shortcut): Path<String>,
) -> Result<Response, ShortcutError> {
    state.resolver().initiate(&shortcut, None)
}

/// `/login/{shortcut}/`: the suffix is present but empty.
pub async fn login_with_empty_suffix<E: SamlEngine>(
    State(state): State<AppState<E>>,
    Path(shortcut): Path<String>,
) -> Result<Response, ShortcutError> {
    state.resolver().initiate(&shortcut, Some(""))
}

pub async fn login_with_suffix<E: SamlEngine>(
    State(state): State<AppState<E>>,
    Path((shortcut, suffix)): Path<(String, String)>,
) -> Result<Response, ShortcutError> {
    state.resolver().initiate(&shortcut, Some(&suffix))
}

pub async fn healthz() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "samlidp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
