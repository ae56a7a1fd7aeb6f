//! The OpenID recipe: a composer over the JWT recipe.
//!
//! Construction order matters: the JWT sub-recipe is built first (with its
//! own override slice), then this recipe's default programmatic table is
//! built *on top of the sub-recipe's post-override table*, then this
//! recipe's own overrides run. Tokens minted here carry the configured
//! issuer claim before the JWT sub-recipe ever sees the payload.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::AppSettings;
use crate::core_client::RequestSender;
use crate::errors::{AuthError, ConfigError, InitError};
use crate::recipe::{
    ApiOptions, Fallback, Op, RecipeBuildContext, RecipeInit, RecipeModule, RouteDescriptor,
    apply_override,
};
use crate::request::{ApiOutcome, ApiRequest, RequestContext};
use crate::recipes::jwt::{CreateJwtInput, CreateJwtOutcome, JwtConfig, JwtRecipe};

use super::api::{ApiInterface, build_routes, default_api_interface};
use super::config::{OpenIdConfig, OpenIdSettings, normalize};
use super::types::{DiscoveryConfiguration, GetDiscoveryConfigurationInput};

pub const RECIPE_ID: &str = "openid";

pub struct RecipeInterface {
    pub get_discovery_configuration:
        Option<Op<GetDiscoveryConfigurationInput, DiscoveryConfiguration>>,
    /// Mint a token with the issuer claim injected, delegating to the JWT
    /// sub-recipe
    pub create_jwt: Option<Op<CreateJwtInput, CreateJwtOutcome>>,
}

pub(crate) fn default_recipe_interface(
    settings: Arc<OpenIdSettings>,
    jwt_impl: Arc<crate::recipes::jwt::RecipeInterface>,
) -> RecipeInterface {
    let get_discovery_configuration: Op<GetDiscoveryConfigurationInput, DiscoveryConfiguration> = {
        let settings = settings.clone();
        Arc::new(move |_input: GetDiscoveryConfigurationInput| {
            let settings = settings.clone();
            Box::pin(async move {
                Ok(DiscoveryConfiguration {
                    issuer: settings.issuer.clone(),
                    jwks_uri: format!("{}/jwt/jwks.json", settings.issuer),
                })
            })
        })
    };

    let create_jwt: Op<CreateJwtInput, CreateJwtOutcome> = {
        let settings = settings.clone();
        Arc::new(move |mut input: CreateJwtInput| {
            let settings = settings.clone();
            let jwt_impl = jwt_impl.clone();
            Box::pin(async move {
                let Some(inner) = jwt_impl.create_jwt.clone() else {
                    return Err(AuthError::General(
                        "jwt create operation was disabled by an override".to_string(),
                    ));
                };
                if input.payload.is_null() {
                    input.payload = json!({});
                }
                match input.payload.as_object_mut() {
                    Some(claims) => {
                        claims
                            .entry("iss")
                            .or_insert_with(|| Value::String(settings.issuer.clone()));
                    }
                    None => {
                        return Err(AuthError::BadInput(
                            "token payload must be a JSON object".to_string(),
                        ));
                    }
                }
                inner(input).await
            })
        })
    };

    RecipeInterface {
        get_discovery_configuration: Some(get_discovery_configuration),
        create_jwt: Some(create_jwt),
    }
}

pub struct OpenIdRecipe {
    settings: Arc<OpenIdSettings>,
    jwt: Arc<JwtRecipe>,
    recipe_impl: Arc<RecipeInterface>,
    api_impl: Arc<ApiInterface>,
    routes: Vec<RouteDescriptor>,
}

impl OpenIdRecipe {
    pub fn new(
        app: &AppSettings,
        core: Arc<dyn RequestSender>,
        config: OpenIdConfig,
    ) -> Result<Self, ConfigError> {
        let settings = Arc::new(normalize(&config, app)?);

        // Sub-recipe first; its override slice comes from this recipe's
        // override record
        let jwt = Arc::new(JwtRecipe::new(
            app,
            core,
            JwtConfig {
                jwt_validity_seconds: config.jwt_validity_seconds,
                overrides: config.overrides.jwt,
            },
        )?);

        let recipe_impl = Arc::new(apply_override(
            default_recipe_interface(settings.clone(), jwt.recipe_impl()),
            config.overrides.functions,
        ));
        let api_impl = Arc::new(apply_override(
            default_api_interface(),
            config.overrides.apis,
        ));

        // Route table: direct routes plus everything the sub-recipe owns
        let mut routes = build_routes(&api_impl);
        routes.extend(jwt.routes().iter().cloned());

        Ok(Self {
            settings,
            jwt,
            recipe_impl,
            api_impl,
            routes,
        })
    }

    pub fn recipe_impl(&self) -> Arc<RecipeInterface> {
        self.recipe_impl.clone()
    }

    pub fn settings(&self) -> &OpenIdSettings {
        &self.settings
    }

    pub fn instance() -> Result<Arc<Self>, InitError> {
        crate::registry::recipe_instance::<Self>(RECIPE_ID)
    }
}

#[async_trait]
impl RecipeModule for OpenIdRecipe {
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
            super::api::DISCOVERY_ROUTE => self.api_impl.discovery_get.clone(),
            super::api::TOKEN_ROUTE => self.api_impl.token_post.clone(),
            _ => {
                // Not a direct route: forward verbatim to the owning
                // sub-recipe
                return self
                    .jwt
                    .handle_request(route_id, request, tenant_id, context, fallback)
                    .await;
            }
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
        self.jwt.cors_allowed_headers()
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub fn init(config: OpenIdConfig) -> RecipeInit {
    Box::new(move |context: &RecipeBuildContext| {
        let recipe = OpenIdRecipe::new(&context.app, context.core.clone(), config)?;
        Ok(Arc::new(recipe) as Arc<dyn RecipeModule>)
    })
}
