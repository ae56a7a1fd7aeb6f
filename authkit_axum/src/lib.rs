//! authkit-axum - axum integration for the authkit authentication SDK
//!
//! Wires an [`authkit::ProcessRegistry`] into an axum application:
//!
//! ```ignore
//! let registry = Arc::new(ProcessRegistry::build(auth_config)?);
//! let app = with_authkit(app, registry.clone()).layer(cors_layer(&registry));
//! ```
//!
//! Routes the kernel declines fall through to the host router untouched,
//! so the host can serve its own handler at a path whose default was
//! disabled.

mod cors;
mod middleware;

pub use cors::cors_layer;
pub use middleware::{authkit_middleware, with_authkit};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Router, body::Body, routing::post};
    use http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use authkit::test_utils::{MockRequestSender, test_app_config};
    use authkit::{ProcessRegistry, emailpassword};

    use super::*;

    fn registry(sender: MockRequestSender, config: emailpassword::EmailPasswordConfig) -> Arc<ProcessRegistry> {
        Arc::new(
            ProcessRegistry::build_with_sender(
                test_app_config(),
                vec![emailpassword::init(config)],
                Arc::new(sender),
            )
            .unwrap(),
        )
    }

    fn app(registry: Arc<ProcessRegistry>) -> Router {
        let host_routes = Router::new()
            .route("/auth/signin", post(|| async { "host handler" }))
            .route("/api/echo", post(|| async { "echo" }));
        with_authkit(host_routes, registry)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_recipe_route_is_served_by_the_kernel() {
        let sender = MockRequestSender::new().respond_with(
            "POST",
            "/recipe/signin",
            json!({"status": "OK", "user": {
                "id": "user-1", "email": "a@b.c", "timeJoined": "2026-01-05T10:00:00Z",
            }}),
        );
        let app = app(registry(sender, Default::default()));

        let response = app
            .oneshot(
                Request::post("/auth/signin")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"email": "a@b.c", "password": "password123"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["user"]["id"], "user-1");
    }

    #[tokio::test]
    async fn test_disabled_route_falls_through_to_host_handler() {
        let config = emailpassword::EmailPasswordConfig {
            overrides: emailpassword::EmailPasswordOverrides {
                apis: Some(Box::new(|mut api: emailpassword::ApiInterface| {
                    api.sign_in_post = None;
                    api
                })),
                ..Default::default()
            },
            ..Default::default()
        };
        let app = app(registry(MockRequestSender::new(), config));

        let response = app
            .oneshot(
                Request::post("/auth/signin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"host handler");
    }

    #[tokio::test]
    async fn test_unclaimed_auth_path_is_a_plain_404() {
        let app = app(registry(MockRequestSender::new(), Default::default()));
        let response = app
            .oneshot(
                Request::post("/auth/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_routes_outside_the_base_path_are_untouched() {
        let app = app(registry(MockRequestSender::new(), Default::default()));
        let response = app
            .oneshot(Request::post("/api/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
