//! HTTP capability table and route table for the email-password recipe

use std::sync::Arc;

use http::Method;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AuthError;
use crate::recipe::{ApiHandler, ApiOptions, RouteDescriptor};
use crate::request::{ApiOutcome, ApiResponse};

use super::config::EmailPasswordSettings;
use super::recipe::{RECIPE_ID, RecipeInterface};
use super::types::{GetUserByEmailInput, SignInInput, SignInOutcome, SignUpInput, SignUpOutcome};

pub const SIGN_UP_ROUTE: &str = "signup";
pub const SIGN_IN_ROUTE: &str = "signin";
pub const EMAIL_EXISTS_ROUTE: &str = "emailexists";

pub type EmailPasswordApiOptions = ApiOptions<EmailPasswordSettings, RecipeInterface>;
type Handler = ApiHandler<EmailPasswordSettings, RecipeInterface>;

/// HTTP capability table; structurally the same as the programmatic one,
/// but each slot receives the per-request options bundle
pub struct ApiInterface {
    pub sign_up_post: Option<Handler>,
    pub sign_in_post: Option<Handler>,
    pub email_exists_get: Option<Handler>,
}

#[derive(Deserialize)]
struct CredentialsPayload {
    email: String,
    password: String,
}

pub(crate) fn default_api_interface() -> ApiInterface {
    let sign_up_post: Handler = Arc::new(|options: EmailPasswordApiOptions| {
        Box::pin(async move {
            let payload: CredentialsPayload = options.request.json()?;
            if payload.password.len() < options.settings.minimum_password_length {
                return Ok(ApiOutcome::Response(ApiResponse::ok_json(json!({
                    "status": "FIELD_ERROR",
                    "message": format!(
                        "password must be at least {} characters",
                        options.settings.minimum_password_length
                    ),
                }))));
            }
            let Some(sign_up) = options.recipe_impl.sign_up.clone() else {
                return (options.fallback)().await;
            };
            let outcome = sign_up(SignUpInput {
                email: payload.email,
                password: payload.password,
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            let body = match outcome {
                SignUpOutcome::Ok { user } => json!({"status": "OK", "user": user}),
                SignUpOutcome::EmailAlreadyExists => {
                    json!({"status": "EMAIL_ALREADY_EXISTS_ERROR"})
                }
            };
            Ok(ApiOutcome::Response(ApiResponse::ok_json(body)))
        })
    });

    let sign_in_post: Handler = Arc::new(|options: EmailPasswordApiOptions| {
        Box::pin(async move {
            let payload: CredentialsPayload = options.request.json()?;
            let Some(sign_in) = options.recipe_impl.sign_in.clone() else {
                return (options.fallback)().await;
            };
            let outcome = sign_in(SignInInput {
                email: payload.email,
                password: payload.password,
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            let body = match outcome {
                SignInOutcome::Ok { user } => json!({"status": "OK", "user": user}),
                SignInOutcome::WrongCredentials => json!({"status": "WRONG_CREDENTIALS_ERROR"}),
            };
            Ok(ApiOutcome::Response(ApiResponse::ok_json(body)))
        })
    });

    let email_exists_get: Handler = Arc::new(|options: EmailPasswordApiOptions| {
        Box::pin(async move {
            let email = options
                .request
                .query
                .get("email")
                .cloned()
                .ok_or_else(|| AuthError::BadInput("missing `email` query parameter".to_string()))?;
            let Some(get_user_by_email) = options.recipe_impl.get_user_by_email.clone() else {
                return (options.fallback)().await;
            };
            let user = get_user_by_email(GetUserByEmailInput {
                email,
                tenant_id: options.tenant_id.clone(),
                context: options.context.clone(),
            })
            .await?;
            Ok(ApiOutcome::Response(ApiResponse::ok_json(json!({
                "status": "OK",
                "exists": user.is_some(),
            }))))
        })
    });

    ApiInterface {
        sign_up_post: Some(sign_up_post),
        sign_in_post: Some(sign_in_post),
        email_exists_get: Some(email_exists_get),
    }
}

/// One descriptor per known route id; `enabled` reflects whether the slot
/// survived the overrides
pub(crate) fn build_routes(api: &ApiInterface) -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(
            SIGN_UP_ROUTE,
            Method::POST,
            "/signup",
            api.sign_up_post.is_some(),
            RECIPE_ID,
        ),
        RouteDescriptor::new(
            SIGN_IN_ROUTE,
            Method::POST,
            "/signin",
            api.sign_in_post.is_some(),
            RECIPE_ID,
        ),
        RouteDescriptor::new(
            EMAIL_EXISTS_ROUTE,
            Method::GET,
            "/signup/email/exists",
            api.email_exists_get.is_some(),
            RECIPE_ID,
        ),
    ]
}
