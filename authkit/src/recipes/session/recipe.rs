//! The session recipe: session lifecycle against the remote core

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::core_client::RequestSender;
use crate::errors::{AuthError, ConfigError, InitError};
use crate::recipe::{
    ApiOptions, Fallback, Op, RecipeBuildContext, RecipeInit, RecipeModule, RouteDescriptor,
    apply_override,
};
use crate::request::{ApiOutcome, ApiRequest, ApiResponse, RequestContext};

use super::api::{ApiInterface, build_routes, default_api_interface};
use super::config::{AntiCsrfMode, SessionConfig, SessionSettings, normalize};
use super::types::{
    CreateSessionInput, GetSessionInput, RefreshSessionInput, RevokeAllSessionsInput,
    RevokeSessionInput, Session, session_from_core,
};

pub const RECIPE_ID: &str = "session";

/// Header carrying the anti-CSRF token when [`AntiCsrfMode::ViaCustomHeader`]
pub const ANTI_CSRF_HEADER: &str = "anti-csrf";

pub struct RecipeInterface {
    pub create_new_session: Option<Op<CreateSessionInput, Session>>,
    pub get_session: Option<Op<GetSessionInput, Session>>,
    pub refresh_session: Option<Op<RefreshSessionInput, Session>>,
    pub revoke_session: Option<Op<RevokeSessionInput, bool>>,
    pub revoke_all_sessions_for_user: Option<Op<RevokeAllSessionsInput, Vec<String>>>,
}

pub(crate) fn default_recipe_interface(core: Arc<dyn RequestSender>) -> RecipeInterface {
    let create_new_session: Op<CreateSessionInput, Session> = {
        let core = core.clone();
        Arc::new(move |input: CreateSessionInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/session",
                        json!({
                            "userId": input.user_id,
                            "accessTokenPayload": input.access_token_payload,
                        }),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => session_from_core(&response["session"]),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "session creation answered {response}"
                    ))),
                }
            })
        })
    };

    let get_session: Op<GetSessionInput, Session> = {
        let core = core.clone();
        Arc::new(move |input: GetSessionInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/session/verify",
                        json!({"accessToken": input.access_token}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => session_from_core(&response["session"]),
                    Some("UNAUTHORISED") => {
                        Err(AuthError::Unauthorized("session does not exist".to_string()))
                    }
                    Some("TRY_REFRESH_TOKEN") => Err(AuthError::TryRefreshToken),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "session verify answered {response}"
                    ))),
                }
            })
        })
    };

    let refresh_session: Op<RefreshSessionInput, Session> = {
        let core = core.clone();
        Arc::new(move |input: RefreshSessionInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/session/refresh",
                        json!({"refreshToken": input.refresh_token}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => session_from_core(&response["session"]),
                    Some("UNAUTHORISED") => {
                        Err(AuthError::Unauthorized("refresh token invalid".to_string()))
                    }
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "session refresh answered {response}"
                    ))),
                }
            })
        })
    };

    let revoke_session: Op<RevokeSessionInput, bool> = {
        let core = core.clone();
        Arc::new(move |input: RevokeSessionInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/session/remove",
                        json!({"sessionHandles": [input.session_handle]}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                let revoked = response["sessionHandlesRevoked"]
                    .as_array()
                    .map(|handles| !handles.is_empty())
                    .unwrap_or(false);
                Ok(revoked)
            })
        })
    };

    let revoke_all_sessions_for_user: Op<RevokeAllSessionsInput, Vec<String>> = {
        let core = core.clone();
        Arc::new(move |input: RevokeAllSessionsInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/session/remove",
                        json!({"userId": input.user_id}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                let handles = response["sessionHandlesRevoked"]
                    .as_array()
                    .map(|handles| {
                        handles
                            .iter()
                            .filter_map(|handle| handle.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(handles)
            })
        })
    };

    RecipeInterface {
        create_new_session: Some(create_new_session),
        get_session: Some(get_session),
        refresh_session: Some(refresh_session),
        revoke_session: Some(revoke_session),
        revoke_all_sessions_for_user: Some(revoke_all_sessions_for_user),
    }
}

pub struct SessionRecipe {
    settings: Arc<SessionSettings>,
    recipe_impl: Arc<RecipeInterface>,
    api_impl: Arc<ApiInterface>,
    routes: Vec<RouteDescriptor>,
}

impl SessionRecipe {
    pub fn new(core: Arc<dyn RequestSender>, config: SessionConfig) -> Result<Self, ConfigError> {
        let settings = Arc::new(normalize(&config)?);
        let recipe_impl = Arc::new(apply_override(
            default_recipe_interface(core),
            config.overrides.functions,
        ));
        let api_impl = Arc::new(apply_override(
            default_api_interface(),
            config.overrides.apis,
        ));
        let routes = build_routes(&api_impl);
        Ok(Self {
            settings,
            recipe_impl,
            api_impl,
            routes,
        })
    }

    pub fn recipe_impl(&self) -> Arc<RecipeInterface> {
        self.recipe_impl.clone()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn instance() -> Result<Arc<Self>, InitError> {
        crate::registry::recipe_instance::<Self>(RECIPE_ID)
    }
}

#[async_trait]
impl RecipeModule for SessionRecipe {
    fn recipe_id(&self) -> &'static str {
        RECIPE_ID
    }

    fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    async fn handle_request(
        &self,
        route_id: &str,
        request: ApiRequest,
        tenant_id: &str,
        context: RequestContext,
        fallback: Fallback,
    ) -> Result<ApiOutcome, AuthError> {
        let slot = match route_id {
            super::api::SIGN_OUT_ROUTE => self.api_impl.sign_out_post.clone(),
            super::api::REFRESH_ROUTE => self.api_impl.refresh_post.clone(),
            _ => None,
        };
        match slot {
            Some(handler) => {
                handler(ApiOptions {
                    settings: self.settings.clone(),
                    recipe_impl: self.recipe_impl.clone(),
                    request,
                    tenant_id: tenant_id.to_string(),
                    context,
                    fallback,
                })
                .await
            }
            None => fallback().await,
        }
    }

    fn cors_allowed_headers(&self) -> Vec<String> {
        match self.settings.anti_csrf {
            AntiCsrfMode::ViaCustomHeader => vec![ANTI_CSRF_HEADER.to_string()],
            AntiCsrfMode::Disabled => Vec::new(),
        }
    }

    /// Session expiry answers with the configured status code instead of
    /// the registry's default mapping
    fn translate_error(&self, err: &AuthError) -> Option<ApiResponse> {
        let status = http::StatusCode::from_u16(self.settings.session_expired_status_code).ok()?;
        match err {
            AuthError::Unauthorized(_) => Some(ApiResponse::json(
                status,
                json!({"message": "unauthorised"}),
            )),
            AuthError::TryRefreshToken => Some(ApiResponse::json(
                status,
                json!({"message": "try refresh token"}),
            )),
            _ => None,
        }
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub fn init(config: SessionConfig) -> RecipeInit {
    Box::new(move |context: &RecipeBuildContext| {
        let recipe = SessionRecipe::new(context.core.clone(), config)?;
        Ok(Arc::new(recipe) as Arc<dyn RecipeModule>)
    })
}
