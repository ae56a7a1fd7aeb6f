//! HTTP capability table for the session recipe.
//!
//! Cookie serialization is out of scope for this SDK; tokens travel in
//! headers (`authorization: Bearer <access>`, `refresh-token`) and the
//! refreshed session is returned in the response body.

use std::sync::Arc;

use http::Method;
use serde_json::json;

use crate::errors::AuthError;
use crate::recipe::{ApiHandler, ApiOptions, RouteDescriptor};
use crate::request::{ApiOutcome, ApiRequest, ApiResponse};

use super::config::SessionSettings;
use super::recipe::{RECIPE_ID, RecipeInterface};
use super::types::{GetSessionInput, RefreshSessionInput, RevokeSessionInput};

pub const SIGN_OUT_ROUTE: &str = "signout";
pub const REFRESH_ROUTE: &str = "refresh";

/// Header carrying the refresh token on `/session/refresh`
pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";

pub type SessionApiOptions = ApiOptions<SessionSettings, RecipeInterface>;
type Handler = ApiHandler<SessionSettings, RecipeInterface>;

pub struct ApiInterface {
    pub sign_out_post: Option<Handler>,
    pub refresh_post: Option<Handler>,
}

fn bearer_token(request: &ApiRequest) -> Result<String, AuthError> {
    let header = request
        .header("authorization")
        .ok_or_else(|| AuthError::Unauthorized("missing authorization header".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AuthError::Unauthorized("authorization header is not a bearer token".to_string()))
}

pub(crate) fn default_api_interface() -> ApiInterface {
    let sign_out_post: Handler = Arc::new(|options: SessionApiOptions| {
        Box::pin(async move {
            let access_token = bearer_token(&options.request)?;
            let (Some(get_session), Some(revoke_session)) = (
                options.recipe_impl.get_session.clone(),
                options.recipe_impl.revoke_session.clone(),
            ) else {
                return (options.fallback)().await;
            };
            let session = get_session(GetSessionInput {
                access_token,
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            revoke_session(RevokeSessionInput {
                session_handle: session.handle,
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            Ok(ApiOutcome::Response(ApiResponse::ok_json(
                json!({"status": "OK"}),
            )))
        })
    });

    let refresh_post: Handler = Arc::new(|options: SessionApiOptions| {
        Box::pin(async move {
            let refresh_token = options
                .request
                .header(REFRESH_TOKEN_HEADER)
                .map(str::to_string)
                .ok_or_else(|| {
                    AuthError::Unauthorized("missing refresh-token header".to_string())
                })?;
            let Some(refresh_session) = options.recipe_impl.refresh_session.clone() else {
                return (options.fallback)().await;
            };
            let session = refresh_session(RefreshSessionInput {
                refresh_token,
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            Ok(ApiOutcome::Response(ApiResponse::ok_json(
                json!({"status": "OK", "session": session}),
            )))
        })
    });

    ApiInterface {
        sign_out_post: Some(sign_out_post),
        refresh_post: Some(refresh_post),
    }
}

pub(crate) fn build_routes(api: &ApiInterface) -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(
            SIGN_OUT_ROUTE,
            Method::POST,
            "/signout",
            api.sign_out_post.is_some(),
            RECIPE_ID,
        ),
        RouteDescriptor::new(
            REFRESH_ROUTE,
            Method::POST,
            "/session/refresh",
            api.refresh_post.is_some(),
            RECIPE_ID,
        ),
    ]
}
