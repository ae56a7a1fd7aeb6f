//! JWT recipe.
//!
//! Mints signed tokens through the remote core and serves the core's JSON
//! Web Key Set so relying parties can verify them. Signing itself is the
//! core's business; this recipe only shapes requests and exposes the JWKS
//! route.

mod api;
mod config;
mod recipe;
mod types;

pub use api::{ApiInterface, JWKS_ROUTE, JwtApiOptions};
pub use config::{DEFAULT_JWT_VALIDITY_SECONDS, JwtConfig, JwtOverrides, JwtSettings};
pub use recipe::{JwtRecipe, RECIPE_ID, RecipeInterface, init};
pub use types::{CreateJwtInput, CreateJwtOutcome, GetJwksInput, JsonWebKey, Jwks};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use serde_json::json;

    use crate::config::AppSettings;
    use crate::recipe::{RecipeModule, passthrough_fallback};
    use crate::request::{ApiRequest, RequestContext};
    use crate::test_utils::{MockRequestSender, test_app_config};

    use super::*;

    fn jwks_body() -> serde_json::Value {
        json!({
            "status": "OK",
            "keys": [{
                "kty": "RSA",
                "kid": "key-1",
                "n": "modulus",
                "e": "AQAB",
                "alg": "RS256",
                "use": "sig",
            }],
        })
    }

    fn recipe(sender: MockRequestSender) -> JwtRecipe {
        let app = AppSettings::normalize(&test_app_config()).unwrap();
        JwtRecipe::new(&app, Arc::new(sender), JwtConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_jwks_route_serves_core_keys() {
        let sender = MockRequestSender::new().respond_with("GET", "/recipe/jwt/jwks", jwks_body());
        let recipe = recipe(sender);
        let outcome = recipe
            .handle_request(
                JWKS_ROUTE,
                ApiRequest::new(Method::GET, "/auth/jwt/jwks.json"),
                "public",
                RequestContext::new(),
                passthrough_fallback(),
            )
            .await
            .unwrap();
        let response = outcome.into_response().unwrap();
        assert_eq!(response.json_body().unwrap()["keys"][0]["kid"], "key-1");
    }

    #[tokio::test]
    async fn test_create_jwt_uses_configured_validity() {
        let sender = MockRequestSender::new().respond_with(
            "POST",
            "/recipe/jwt",
            json!({"status": "OK", "jwt": "a.b.c"}),
        );
        let sender = Arc::new(sender);
        let app = AppSettings::normalize(&test_app_config()).unwrap();
        let recipe = JwtRecipe::new(&app, sender.clone(), JwtConfig::default()).unwrap();

        let create_jwt = recipe.recipe_impl().create_jwt.clone().unwrap();
        let outcome = create_jwt(CreateJwtInput {
            payload: json!({"sub": "user-1"}),
            validity_seconds: None,
            tenant_id: "public".to_string(),
            context: RequestContext::new(),
        })
        .await
        .unwrap();
        assert_eq!(
            outcome,
            CreateJwtOutcome::Ok {
                jwt: "a.b.c".to_string()
            }
        );

        let calls = sender.calls_to("/recipe/jwt");
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body["validity"],
            json!(DEFAULT_JWT_VALIDITY_SECONDS)
        );
        assert_eq!(calls[0].body["jwksDomain"], "https://api.test.example");
    }

    #[tokio::test]
    async fn test_unexpected_core_answer_is_a_domain_error() {
        let sender =
            MockRequestSender::new().respond_with("POST", "/recipe/jwt", json!({"nope": true}));
        let recipe = recipe(sender);
        let create_jwt = recipe.recipe_impl().create_jwt.clone().unwrap();
        let err = create_jwt(CreateJwtInput {
            payload: json!({}),
            validity_seconds: None,
            tenant_id: "public".to_string(),
            context: RequestContext::new(),
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            crate::errors::AuthError::UnexpectedCoreResponse(_)
        ));
    }
}
