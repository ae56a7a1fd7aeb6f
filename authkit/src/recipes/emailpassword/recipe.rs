//! The email-password recipe: default programmatic table, recipe instance,
//! and module wiring

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
use crate::request::{ApiOutcome, ApiRequest, RequestContext};

use super::api::{ApiInterface, build_routes, default_api_interface};
use super::config::{EmailPasswordConfig, EmailPasswordSettings, normalize};
use super::types::{
    GetUserByEmailInput, GetUserByIdInput, SignInInput, SignInOutcome, SignUpInput, SignUpOutcome,
    User, user_from_core,
};

pub const RECIPE_ID: &str = "emailpassword";

/// Programmatic capability table. Every slot starts populated with a
/// default that talks to the remote core; overrides may replace, wrap, or
/// clear individual slots.
pub struct RecipeInterface {
    pub sign_up: Option<Op<SignUpInput, SignUpOutcome>>,
    pub sign_in: Option<Op<SignInInput, SignInOutcome>>,
    pub get_user_by_id: Option<Op<GetUserByIdInput, Option<User>>>,
    pub get_user_by_email: Option<Op<GetUserByEmailInput, Option<User>>>,
}

pub(crate) fn default_recipe_interface(core: Arc<dyn RequestSender>) -> RecipeInterface {
    let sign_up: Op<SignUpInput, SignUpOutcome> = {
        let core = core.clone();
        Arc::new(move |input: SignUpInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/signup",
                        json!({"email": input.email, "password": input.password}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => Ok(SignUpOutcome::Ok {
                        user: user_from_core(&response["user"])?,
                    }),
                    Some("EMAIL_ALREADY_EXISTS_ERROR") => Ok(SignUpOutcome::EmailAlreadyExists),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "signup answered {response}"
                    ))),
                }
            })
        })
    };

    let sign_in: Op<SignInInput, SignInOutcome> = {
        let core = core.clone();
        Arc::new(move |input: SignInInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/signin",
                        json!({"email": input.email, "password": input.password}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => Ok(SignInOutcome::Ok {
                        user: user_from_core(&response["user"])?,
                    }),
                    Some("WRONG_CREDENTIALS_ERROR") => Ok(SignInOutcome::WrongCredentials),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "signin answered {response}"
                    ))),
                }
            })
        })
    };

    let get_user_by_id: Op<GetUserByIdInput, Option<User>> = {
        let core = core.clone();
        Arc::new(move |input: GetUserByIdInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_get(
                        "/recipe/user",
                        &[("userId", input.user_id)],
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => Ok(Some(user_from_core(&response["user"])?)),
                    Some("UNKNOWN_USER_ID_ERROR") => Ok(None),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "get user answered {response}"
                    ))),
                }
            })
        })
    };

    let get_user_by_email: Op<GetUserByEmailInput, Option<User>> = {
        let core = core.clone();
        Arc::new(move |input: GetUserByEmailInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_get(
                        "/recipe/user",
                        &[("email", input.email)],
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => Ok(Some(user_from_core(&response["user"])?)),
                    Some("UNKNOWN_EMAIL_ERROR") => Ok(None),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "get user answered {response}"
                    ))),
                }
            })
        })
    };

    RecipeInterface {
        sign_up: Some(sign_up),
        sign_in: Some(sign_in),
        get_user_by_id: Some(get_user_by_id),
        get_user_by_email: Some(get_user_by_email),
    }
}

/// The constructed recipe instance; built once during `init`, read-only
/// afterwards
pub struct EmailPasswordRecipe {
    settings: Arc<EmailPasswordSettings>,
    recipe_impl: Arc<RecipeInterface>,
    api_impl: Arc<ApiInterface>,
    routes: Vec<RouteDescriptor>,
}

impl std::fmt::Debug for EmailPasswordRecipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailPasswordRecipe").finish_non_exhaustive()
    }
}

impl EmailPasswordRecipe {
    pub fn new(
        core: Arc<dyn RequestSender>,
        config: EmailPasswordConfig,
    ) -> Result<Self, ConfigError> {
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

    /// The post-override programmatic table, for programmatic use and for
    /// composition
    pub fn recipe_impl(&self) -> Arc<RecipeInterface> {
        self.recipe_impl.clone()
    }

    pub fn settings(&self) -> &EmailPasswordSettings {
        &self.settings
    }

    /// The singleton built by `init`, when this recipe was in the recipe
    /// list
    pub fn instance() -> Result<Arc<Self>, InitError> {
        crate::registry::recipe_instance::<Self>(RECIPE_ID)
    }
}

#[async_trait]
impl RecipeModule for EmailPasswordRecipe {
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
            super::api::SIGN_UP_ROUTE => self.api_impl.sign_up_post.clone(),
            super::api::SIGN_IN_ROUTE => self.api_impl.sign_in_post.clone(),
            super::api::EMAIL_EXISTS_ROUTE => self.api_impl.email_exists_get.clone(),
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

/// Recipe constructor for `init`'s recipe list
pub fn init(config: EmailPasswordConfig) -> RecipeInit {
    Box::new(move |context: &RecipeBuildContext| {
        let recipe = EmailPasswordRecipe::new(context.core.clone(), config)?;
        Ok(Arc::new(recipe) as Arc<dyn RecipeModule>)
    })
}
