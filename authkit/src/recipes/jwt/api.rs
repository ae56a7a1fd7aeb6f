//! HTTP capability table for the JWT recipe

use std::sync::Arc;

use http::Method;
use serde_json::json;

use crate::recipe::{ApiHandler, ApiOptions, RouteDescriptor};
use crate::request::{ApiOutcome, ApiResponse};

use super::config::JwtSettings;
use super::recipe::{RECIPE_ID, RecipeInterface};
use super::types::GetJwksInput;

pub const JWKS_ROUTE: &str = "jwks";

pub type JwtApiOptions = ApiOptions<JwtSettings, RecipeInterface>;
type Handler = ApiHandler<JwtSettings, RecipeInterface>;

pub struct ApiInterface {
    pub jwks_get: Option<Handler>,
}

pub(crate) fn default_api_interface() -> ApiInterface {
    let jwks_get: Handler = Arc::new(|options: JwtApiOptions| {
        Box::pin(async move {
            let Some(get_jwks) = options.recipe_impl.get_jwks.clone() else {
                return (options.fallback)().await;
            };
            let jwks = get_jwks(GetJwksInput {
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            Ok(ApiOutcome::Response(ApiResponse::ok_json(
                json!({"keys": jwks.keys}),
            )))
        })
    });

    ApiInterface {
        jwks_get: Some(jwks_get),
    }
}

pub(crate) fn build_routes(api: &ApiInterface) -> Vec<RouteDescriptor> {
    vec![RouteDescriptor::new(
        JWKS_ROUTE,
        Method::GET,
        "/jwt/jwks.json",
        api.jwks_get.is_some(),
        RECIPE_ID,
    )]
}
