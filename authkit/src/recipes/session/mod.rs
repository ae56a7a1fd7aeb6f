//! Session recipe.
//!
//! Session lifecycle (create, verify, refresh, revoke) backed by the
//! remote core. Claim validation and token cryptography are core-side;
//! this recipe owns the HTTP surface and the capability tables, and
//! translates session expiry into the configured status code.

mod api;
mod config;
mod recipe;
mod types;

pub use api::{
    ApiInterface, REFRESH_ROUTE, REFRESH_TOKEN_HEADER, SIGN_OUT_ROUTE, SessionApiOptions,
};
pub use config::{
    AntiCsrfMode, DEFAULT_SESSION_EXPIRED_STATUS_CODE, SessionConfig, SessionOverrides,
    SessionSettings,
};
pub use recipe::{ANTI_CSRF_HEADER, RECIPE_ID, RecipeInterface, SessionRecipe, init};
pub use types::{
    CreateSessionInput, GetSessionInput, RefreshSessionInput, RevokeAllSessionsInput,
    RevokeSessionInput, Session,
};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use serde_json::json;

    use crate::errors::AuthError;
    use crate::recipe::{RecipeModule, passthrough_fallback};
    use crate::request::{ApiRequest, RequestContext};
    use crate::test_utils::MockRequestSender;

    use super::*;

    fn core_session() -> serde_json::Value {
        json!({
            "handle": "handle-1",
            "userId": "user-1",
            "accessToken": "at-1",
            "refreshToken": "rt-1",
            "accessTokenPayload": {"role": "admin"},
        })
    }

    #[tokio::test]
    async fn test_refresh_route_returns_new_session() {
        let sender = MockRequestSender::new().respond_with(
            "POST",
            "/recipe/session/refresh",
            json!({"status": "OK", "session": core_session()}),
        );
        let recipe = SessionRecipe::new(Arc::new(sender), SessionConfig::default()).unwrap();
        let mut request = ApiRequest::new(Method::POST, "/auth/session/refresh");
        request
            .headers
            .insert(REFRESH_TOKEN_HEADER, "rt-0".parse().unwrap());
        let outcome = recipe
            .handle_request(
                REFRESH_ROUTE,
                request,
                "public",
                RequestContext::new(),
                passthrough_fallback(),
            )
            .await
            .unwrap();
        let response = outcome.into_response().unwrap();
        assert_eq!(
            response.json_body().unwrap()["session"]["accessToken"],
            "at-1"
        );
    }

    #[tokio::test]
    async fn test_sign_out_verifies_then_revokes() {
        let sender = Arc::new(
            MockRequestSender::new()
                .respond_with(
                    "POST",
                    "/recipe/session/verify",
                    json!({"status": "OK", "session": core_session()}),
                )
                .respond_with(
                    "POST",
                    "/recipe/session/remove",
                    json!({"status": "OK", "sessionHandlesRevoked": ["handle-1"]}),
                ),
        );
        let recipe = SessionRecipe::new(sender.clone(), SessionConfig::default()).unwrap();
        let mut request = ApiRequest::new(Method::POST, "/auth/signout");
        request
            .headers
            .insert("authorization", "Bearer at-1".parse().unwrap());
        let outcome = recipe
            .handle_request(
                SIGN_OUT_ROUTE,
                request,
                "public",
                RequestContext::new(),
                passthrough_fallback(),
            )
            .await
            .unwrap();
        assert_eq!(
            outcome.into_response().unwrap().json_body().unwrap()["status"],
            "OK"
        );
        let revokes = sender.calls_to("/recipe/session/remove");
        assert_eq!(revokes.len(), 1);
        assert_eq!(revokes[0].body["sessionHandles"][0], "handle-1");
    }

    #[tokio::test]
    async fn test_expired_session_translates_to_configured_status() {
        let sender = MockRequestSender::new().respond_with(
            "POST",
            "/recipe/session/verify",
            json!({"status": "UNAUTHORISED"}),
        );
        let recipe = SessionRecipe::new(
            Arc::new(sender),
            SessionConfig {
                session_expired_status_code: Some(440),
                ..Default::default()
            },
        )
        .unwrap();

        let get_session = recipe.recipe_impl().get_session.clone().unwrap();
        let err = get_session(GetSessionInput {
            access_token: "stale".to_string(),
            tenant_id: "public".to_string(),
            context: RequestContext::new(),
        })
        .await
        .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));

        let response = recipe.translate_error(&err).unwrap();
        assert_eq!(response.status.as_u16(), 440);
        assert_eq!(response.json_body().unwrap()["message"], "unauthorised");
    }

    #[tokio::test]
    async fn test_cors_contribution_follows_anti_csrf_mode() {
        let recipe = SessionRecipe::new(
            Arc::new(MockRequestSender::new()),
            SessionConfig::default(),
        )
        .unwrap();
        assert_eq!(recipe.cors_allowed_headers(), vec!["anti-csrf".to_string()]);

        let recipe = SessionRecipe::new(
            Arc::new(MockRequestSender::new()),
            SessionConfig {
                anti_csrf: Some(AntiCsrfMode::Disabled),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(recipe.cors_allowed_headers().is_empty());
    }
}
