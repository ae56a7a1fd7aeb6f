//! HTTP capability table for the OpenID recipe

use std::sync::Arc;

use http::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::recipe::{ApiHandler, ApiOptions, RouteDescriptor};
use crate::request::{ApiOutcome, ApiResponse};
use crate::recipes::jwt::{CreateJwtInput, CreateJwtOutcome};

use super::config::OpenIdSettings;
use super::recipe::{RECIPE_ID, RecipeInterface};
use super::types::GetDiscoveryConfigurationInput;

pub const DISCOVERY_ROUTE: &str = "openid-discovery";
pub const TOKEN_ROUTE: &str = "token";

pub type OpenIdApiOptions = ApiOptions<OpenIdSettings, RecipeInterface>;
type Handler = ApiHandler<OpenIdSettings, RecipeInterface>;

pub struct ApiInterface {
    pub discovery_get: Option<Handler>,
    pub token_post: Option<Handler>,
}

#[derive(Deserialize)]
struct TokenPayload {
    #[serde(default)]
    payload: Value,
    validity_seconds: Option<u64>,
}

pub(crate) fn default_api_interface() -> ApiInterface {
    let discovery_get: Handler = Arc::new(|options: OpenIdApiOptions| {
        Box::pin(async move {
            let Some(get_configuration) = options.recipe_impl.get_discovery_configuration.clone()
            else {
                return (options.fallback)().await;
            };
            let configuration = get_configuration(GetDiscoveryConfigurationInput {
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            Ok(ApiOutcome::Response(ApiResponse::ok_json(json!({
                "issuer": configuration.issuer,
                "jwks_uri": configuration.jwks_uri,
            }))))
        })
    });

    let token_post: Handler = Arc::new(|options: OpenIdApiOptions| {
        Box::pin(async move {
            let payload: TokenPayload = options.request.json()?;
            let Some(create_jwt) = options.recipe_impl.create_jwt.clone() else {
                return (options.fallback)().await;
            };
            let outcome = create_jwt(CreateJwtInput {
                payload: payload.payload,
                validity_seconds: payload.validity_seconds,
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            let body = match outcome {
                CreateJwtOutcome::Ok { jwt } => json!({"status": "OK", "jwt": jwt}),
                CreateJwtOutcome::UnsupportedAlgorithm => {
                    json!({"status": "UNSUPPORTED_ALGORITHM_ERROR"})
                }
            };
            Ok(ApiOutcome::Response(ApiResponse::ok_json(body)))
        })
    });

    ApiInterface {
        discovery_get: Some(discovery_get),
        token_post: Some(token_post),
    }
}

pub(crate) fn build_routes(api: &ApiInterface) -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(
            DISCOVERY_ROUTE,
            Method::GET,
            "/.well-known/openid-configuration",
            api.discovery_get.is_some(),
            RECIPE_ID,
        ),
        RouteDescriptor::new(
            TOKEN_ROUTE,
            Method::POST,
            "/token",
            api.token_post.is_some(),
            RECIPE_ID,
        ),
    ]
}
