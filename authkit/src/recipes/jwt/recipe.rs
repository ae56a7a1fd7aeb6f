//! The JWT recipe: token minting and JWKS exposure backed by the core

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::config::AppSettings;
use crate::core_client::RequestSender;
use crate::errors::{AuthError, ConfigError, InitError};
use crate::recipe::{
    ApiOptions, Fallback, Op, RecipeBuildContext, RecipeInit, RecipeModule, RouteDescriptor,
    apply_override,
};
use crate::request::{ApiOutcome, ApiRequest, RequestContext};

use super::api::{ApiInterface, build_routes, default_api_interface};
use super::config::{JwtConfig, JwtSettings, normalize};
use super::types::{CreateJwtInput, CreateJwtOutcome, GetJwksInput, Jwks};

pub const RECIPE_ID: &str = "jwt";

pub struct RecipeInterface {
    pub create_jwt: Option<Op<CreateJwtInput, CreateJwtOutcome>>,
    pub get_jwks: Option<Op<GetJwksInput, Jwks>>,
}

pub(crate) fn default_recipe_interface(
    core: Arc<dyn RequestSender>,
    settings: Arc<JwtSettings>,
) -> RecipeInterface {
    let create_jwt: Op<CreateJwtInput, CreateJwtOutcome> = {
        let core = core.clone();
        let settings = settings.clone();
        Arc::new(move |input: CreateJwtInput| {
            let core = core.clone();
            let settings = settings.clone();
            Box::pin(async move {
                let validity = input
                    .validity_seconds
                    .unwrap_or(settings.jwt_validity_seconds);
                let response = core
                    .send_post(
                        "/recipe/jwt",
                        json!({
                            "payload": input.payload,
                            "validity": validity,
                            "algorithm": "RS256",
                            "jwksDomain": settings.jwks_domain,
                        }),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => {
                        let jwt = response["jwt"].as_str().ok_or_else(|| {
                            AuthError::UnexpectedCoreResponse("jwt missing in response".to_string())
                        })?;
                        Ok(CreateJwtOutcome::Ok {
                            jwt: jwt.to_string(),
                        })
                    }
                    Some("UNSUPPORTED_ALGORITHM_ERROR") => Ok(CreateJwtOutcome::UnsupportedAlgorithm),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "jwt creation answered {response}"
                    ))),
                }
            })
        })
    };

    let get_jwks: Op<GetJwksInput, Jwks> = {
        let core = core.clone();
        Arc::new(move |input: GetJwksInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_get("/recipe/jwt/jwks", &[], &input.tenant_id, &input.context)
                    .await?;
                serde_json::from_value(response.clone()).map_err(|e| {
                    AuthError::UnexpectedCoreResponse(format!("malformed JWKS: {e}"))
                })
            })
        })
    };

    RecipeInterface {
        create_jwt: Some(create_jwt),
        get_jwks: Some(get_jwks),
    }
}

pub struct JwtRecipe {
    settings: Arc<JwtSettings>,
    recipe_impl: Arc<RecipeInterface>,
    api_impl: Arc<ApiInterface>,
    routes: Vec<RouteDescriptor>,
}

impl std::fmt::Debug for JwtRecipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtRecipe").finish_non_exhaustive()
    }
}

impl JwtRecipe {
    pub fn new(
        app: &AppSettings,
        core: Arc<dyn RequestSender>,
        config: JwtConfig,
    ) -> Result<Self, ConfigError> {
        let settings = Arc::new(normalize(&config, app)?);
        let recipe_impl = Arc::new(apply_override(
            default_recipe_interface(core, settings.clone()),
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

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }

    pub fn instance() -> Result<Arc<Self>, InitError> {
        crate::registry::recipe_instance::<Self>(RECIPE_ID)
    }
}

#[async_trait]
impl RecipeModule for JwtRecipe {
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
            super::api::JWKS_ROUTE => self.api_impl.jwks_get.clone(),
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

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub fn init(config: JwtConfig) -> RecipeInit {
    Box::new(move |context: &RecipeBuildContext| {
        let recipe = JwtRecipe::new(&context.app, context.core.clone(), config)?;
        Ok(Arc::new(recipe) as Arc<dyn RecipeModule>)
    })
}
