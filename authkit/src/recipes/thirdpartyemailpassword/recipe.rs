//! The third-party-email-password recipe: a composer over the
//! email-password and third-party recipes.
//!
//! Unlike the OpenID composer (whose defaults call *into* its sub-recipe),
//! this composer drives its sub-recipes *from* its own unified table: the
//! post-override unified `sign_in_up` is adapted down into each
//! sub-recipe's narrower table, injected through the sub-recipes' ordinary
//! override hooks. Overriding the composer's unified operation therefore
//! changes the behavior of every route either sub-recipe serves, while
//! each sub-recipe keeps its own independent override layer on top.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::core_client::RequestSender;
use crate::errors::{AuthError, ConfigError, InitError};
use crate::recipe::{
    Fallback, Op, RecipeBuildContext, RecipeInit, RecipeModule, RouteDescriptor, apply_override,
};
use crate::request::{ApiOutcome, ApiRequest, ApiResponse, RequestContext};
use crate::recipes::emailpassword::{
    self, EmailPasswordConfig, EmailPasswordOverrides, EmailPasswordRecipe,
};
use crate::recipes::thirdparty::{self, ThirdPartyConfig, ThirdPartyOverrides, ThirdPartyRecipe};

use super::adapters;
use super::config::{TpepConfig, TpepSettings, normalize};
use super::types::{
    GetUserByEmailInput, GetUserByIdInput, SignInUpCredentials, SignInUpInput, SignInUpOutcome,
    User, user_from_core,
};

pub const RECIPE_ID: &str = "thirdpartyemailpassword";

/// Unified programmatic capability table
pub struct RecipeInterface {
    pub sign_in_up: Option<Op<SignInUpInput, SignInUpOutcome>>,
    pub get_user_by_id: Option<Op<GetUserByIdInput, Option<User>>>,
    pub get_user_by_email: Option<Op<GetUserByEmailInput, Option<User>>>,
}

/// The composer owns no direct routes; its HTTP surface is entirely the
/// sub-recipes'. The empty table keeps the override record uniform.
pub struct ApiInterface {}

pub(crate) fn default_recipe_interface(core: Arc<dyn RequestSender>) -> RecipeInterface {
    let sign_in_up: Op<SignInUpInput, SignInUpOutcome> = {
        let core = core.clone();
        Arc::new(move |input: SignInUpInput| {
            let core = core.clone();
            Box::pin(async move {
                match input.credentials {
                    SignInUpCredentials::EmailPasswordSignUp { email, password } => {
                        let response = core
                            .send_post(
                                "/recipe/signup",
                                json!({"email": email, "password": password}),
                                &input.tenant_id,
                                &input.context,
                            )
                            .await?;
                        match response["status"].as_str() {
                            Some("OK") => Ok(SignInUpOutcome::Ok {
                                created_new_user: true,
                                user: user_from_core(&response["user"])?,
                            }),
                            Some("EMAIL_ALREADY_EXISTS_ERROR") => {
                                Ok(SignInUpOutcome::EmailAlreadyExists)
                            }
                            _ => Err(AuthError::UnexpectedCoreResponse(format!(
                                "signup answered {response}"
                            ))),
                        }
                    }
                    SignInUpCredentials::EmailPasswordSignIn { email, password } => {
                        let response = core
                            .send_post(
                                "/recipe/signin",
                                json!({"email": email, "password": password}),
                                &input.tenant_id,
                                &input.context,
                            )
                            .await?;
                        match response["status"].as_str() {
                            Some("OK") => Ok(SignInUpOutcome::Ok {
                                created_new_user: false,
                                user: user_from_core(&response["user"])?,
                            }),
                            Some("WRONG_CREDENTIALS_ERROR") => {
                                Ok(SignInUpOutcome::WrongCredentials)
                            }
                            _ => Err(AuthError::UnexpectedCoreResponse(format!(
                                "signin answered {response}"
                            ))),
                        }
                    }
                    SignInUpCredentials::ThirdParty {
                        third_party_id,
                        third_party_user_id,
                        email,
                    } => {
                        let response = core
                            .send_post(
                                "/recipe/signinup",
                                json!({
                                    "thirdPartyId": third_party_id,
                                    "thirdPartyUserId": third_party_user_id,
                                    "email": email,
                                }),
                                &input.tenant_id,
                                &input.context,
                            )
                            .await?;
                        match response["status"].as_str() {
                            Some("OK") => Ok(SignInUpOutcome::Ok {
                                created_new_user: response["createdNewUser"]
                                    .as_bool()
                                    .unwrap_or(false),
                                user: user_from_core(&response["user"])?,
                            }),
                            _ => Err(AuthError::UnexpectedCoreResponse(format!(
                                "signinup answered {response}"
                            ))),
                        }
                    }
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
        sign_in_up: Some(sign_in_up),
        get_user_by_id: Some(get_user_by_id),
        get_user_by_email: Some(get_user_by_email),
    }
}

pub struct TpepRecipe {
    settings: Arc<TpepSettings>,
    recipe_impl: Arc<RecipeInterface>,
    email_password: EmailPasswordRecipe,
    third_party: ThirdPartyRecipe,
    routes: Vec<RouteDescriptor>,
}

impl TpepRecipe {
    pub fn new(core: Arc<dyn RequestSender>, config: TpepConfig) -> Result<Self, ConfigError> {
        let settings = Arc::new(normalize(&config)?);

        // Unified table first (defaults, then the composer's own override);
        // the sub-recipes are then constructed around adapters over it
        let recipe_impl = Arc::new(apply_override(
            default_recipe_interface(core.clone()),
            config.overrides.functions,
        ));
        let _api_impl = apply_override(ApiInterface {}, config.overrides.apis);

        let ep_overrides = config.overrides.email_password;
        let email_password = EmailPasswordRecipe::new(
            core.clone(),
            EmailPasswordConfig {
                minimum_password_length: config.minimum_password_length,
                overrides: EmailPasswordOverrides {
                    functions: Some(adapters::chain(
                        adapters::email_password_functions(recipe_impl.clone()),
                        ep_overrides.functions,
                    )),
                    apis: ep_overrides.apis,
                },
            },
        )?;

        let tp_overrides = config.overrides.third_party;
        let third_party = ThirdPartyRecipe::new(
            core,
            ThirdPartyConfig {
                providers: config.providers,
                overrides: ThirdPartyOverrides {
                    functions: Some(adapters::chain(
                        adapters::third_party_functions(recipe_impl.clone()),
                        tp_overrides.functions,
                    )),
                    apis: tp_overrides.apis,
                },
            },
        )?;

        let mut routes = Vec::new();
        routes.extend(email_password.routes().iter().cloned());
        routes.extend(third_party.routes().iter().cloned());

        Ok(Self {
            settings,
            recipe_impl,
            email_password,
            third_party,
            routes,
        })
    }

    pub fn recipe_impl(&self) -> Arc<RecipeInterface> {
        self.recipe_impl.clone()
    }

    pub fn settings(&self) -> &TpepSettings {
        &self.settings
    }

    pub fn instance() -> Result<Arc<Self>, InitError> {
        crate::registry::recipe_instance::<Self>(RECIPE_ID)
    }
}

#[async_trait]
impl RecipeModule for TpepRecipe {
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
        let owner = self
            .routes
            .iter()
            .find(|route| route.id == route_id)
            .map(|route| route.handled_by);
        match owner {
            Some(emailpassword::RECIPE_ID) => {
                self.email_password
                    .handle_request(route_id, request, tenant_id, context, fallback)
                    .await
            }
            Some(thirdparty::RECIPE_ID) => {
                self.third_party
                    .handle_request(route_id, request, tenant_id, context, fallback)
                    .await
            }
            _ => fallback().await,
        }
    }

    fn cors_allowed_headers(&self) -> Vec<String> {
        let mut headers = self.email_password.cors_allowed_headers();
        for header in self.third_party.cors_allowed_headers() {
            if !headers.contains(&header) {
                headers.push(header);
            }
        }
        headers
    }

    fn translate_error(&self, err: &AuthError) -> Option<ApiResponse> {
        self.email_password
            .translate_error(err)
            .or_else(|| self.third_party.translate_error(err))
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub fn init(config: TpepConfig) -> RecipeInit {
    Box::new(move |context: &RecipeBuildContext| {
        let recipe = TpepRecipe::new(context.core.clone(), config)?;
        Ok(Arc::new(recipe) as Arc<dyn RecipeModule>)
    })
}
