//! Route definitions.

use crate::engine::SamlEngine;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Create the shortcut router.
pub fn create_router<E: SamlEngine + 'static>(state: AppState<E>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        // Shortcut administration
        .route("/shortcuts", get(handlers::list_shortcuts::<E>))
        .route("/shortcuts/", get(handlers::list_shortcuts::<E>))
        .route(
            "/shortcuts/{id}",
            get(handlers::get_shortcut::<E>)
                .put(handlers::put_shortcut::<E>)
                .delete(handlers::delete_shortcut::<E>),
        )
        // IdP-initiated login
        .route(
            "/login/{shortcut}",
            get(handlers::login::<E>).post(handlers::login::<E>),
        )
        .route(
            "/login/{shortcut}/",
            get(handlers::login_with_empty_suffix::<E>)
                .post(handlers::login_with_empty_suffix::<E>),
        )
        .route(
            "/login/{shortcut}/{*suffix}",
            get(handlers::login_with_suffix::<E>).post(handlers::login_with_suffix::<E>),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SharedIdp, UpstreamRedirectEngine};
    use crate::registry::tests::BrokenStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use samlidp_core::Shortcut;
    use samlidp_store::{KeyValueStore, MemoryStore};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    const UPSTREAM: &str = "https://idp.example.com/saml/idp-initiated";

    fn state_over(store: Arc<dyn KeyValueStore>) -> AppState<UpstreamRedirectEngine> {
        let engine = UpstreamRedirectEngine::parse(UPSTREAM).unwrap();
        AppState::new(store, Arc::new(SharedIdp::new(engine)))
    }

    fn state() -> AppState<UpstreamRedirectEngine> {
        state_over(Arc::new(MemoryStore::new()))
    }

    async fn send(
        state: &AppState<UpstreamRedirectEngine>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        create_router(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = send(&state(), Method::GET, "/healthz", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], true);
    }

    #[tokio::test]
    async fn test_put_get_list() {
        let state = state();

        let response = send(
            &state,
            Method::PUT,
            "/shortcuts/wiki",
            Some(json!({"service_provider": "https://wiki.example.com/saml/metadata"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&state, Method::GET, "/shortcuts/wiki", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "name": "wiki",
                "service_provider": "https://wiki.example.com/saml/metadata",
            })
        );

        for uri in ["/shortcuts/", "/shortcuts"] {
            let response = send(&state, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await, json!({"shortcuts": ["wiki"]}));
        }
    }

    #[tokio::test]
    async fn test_path_name_overrides_body_name() {
        let state = state();

        let response = send(
            &state,
            Method::PUT,
            "/shortcuts/foo",
            Some(json!({"name": "bar", "service_provider": "sp1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&state, Method::GET, "/shortcuts/foo", None).await;
        assert_eq!(body_json(response).await["name"], "foo");

        let response = send(&state, Method::GET, "/shortcuts/", None).await;
        assert_eq!(body_json(response).await, json!({"shortcuts": ["foo"]}));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let state = state();

        for body in ["{not json", "[1, 2]", r#"{"service_provider": 42}"#, ""] {
            let request = Request::builder()
                .method(Method::PUT)
                .uri("/shortcuts/app")
                .body(Body::from(body))
                .unwrap();
            let response = create_router(state.clone()).oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(body_text(response).await, "Bad Request");
        }

        assert!(state.registry().list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_shortcut_is_internal_error() {
        let response = send(&state(), Method::GET, "/shortcuts/nope", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let state = state();
        state
            .registry()
            .put("app", Shortcut::new("app", "sp1"))
            .unwrap();

        let response = send(&state, Method::DELETE, "/shortcuts/app", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&state, Method::DELETE, "/shortcuts/app", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&state, Method::GET, "/shortcuts/app", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_store_failures_are_internal_errors() {
        let state = state_over(Arc::new(BrokenStore));

        let response = send(&state, Method::GET, "/shortcuts/", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = send(
            &state,
            Method::PUT,
            "/shortcuts/app",
            Some(json!({"service_provider": "sp1"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = send(&state, Method::DELETE, "/shortcuts/app", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_login_redirects_to_upstream() {
        let state = state();
        state
            .registry()
            .put("wiki", Shortcut::new("wiki", "sp1").with_relay_state("/home"))
            .unwrap();

        for method in [Method::GET, Method::POST] {
            let response = send(&state, method, "/login/wiki", None).await;
            assert!(response.status().is_redirection());
            assert_eq!(location(&response), format!("{UPSTREAM}?sp=sp1&RelayState=%2Fhome"));
        }
    }

    #[tokio::test]
    async fn test_login_suffix_as_relay_state() {
        let state = state();
        state
            .registry()
            .put("app", Shortcut::new("app", "sp1").with_suffix_as_relay_state())
            .unwrap();

        let response = send(&state, Method::GET, "/login/app/reports/q3", None).await;
        assert_eq!(
            location(&response),
            format!("{UPSTREAM}?sp=sp1&RelayState=reports%2Fq3")
        );

        let response = send(&state, Method::GET, "/login/app", None).await;
        assert_eq!(location(&response), format!("{UPSTREAM}?sp=sp1"));
    }

    #[tokio::test]
    async fn test_login_trailing_slash_is_empty_suffix() {
        let state = state();
        state
            .registry()
            .put("app", Shortcut::new("app", "sp1").with_suffix_as_relay_state())
            .unwrap();

        for method in [Method::GET, Method::POST] {
            let response = send(&state, method, "/login/app/", None).await;
            assert!(response.status().is_redirection());
            assert_eq!(location(&response), format!("{UPSTREAM}?sp=sp1"));
        }
    }

    #[tokio::test]
    async fn test_login_fixed_relay_state_wins() {
        let state = state();
        state
            .registry()
            .put(
                "app",
                Shortcut::new("app", "sp1")
                    .with_relay_state("fixed")
                    .with_suffix_as_relay_state(),
            )
            .unwrap();

        let response = send(&state, Method::GET, "/login/app/ignored", None).await;
        assert_eq!(location(&response), format!("{UPSTREAM}?sp=sp1&RelayState=fixed"));
    }

    #[tokio::test]
    async fn test_login_unknown_shortcut() {
        let response = send(&state(), Method::GET, "/login/nope", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_login_after_reconfiguration() {
        let state = state();
        state
            .registry()
            .put("app", Shortcut::new("app", "sp1"))
            .unwrap();

        state
            .idp()
            .reconfigure(|engine| {
                engine.set_upstream(url::Url::parse("https://idp2.example.com/start").unwrap())
            })
            .unwrap();

        let response = send(&state, Method::GET, "/login/app", None).await;
        assert_eq!(location(&response), "https://idp2.example.com/start?sp=sp1");
    }
}
