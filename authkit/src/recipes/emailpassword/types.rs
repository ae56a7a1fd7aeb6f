//! Inputs and tagged-union outcomes for the email-password recipe

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AuthError;
use crate::request::RequestContext;

/// A user as stored by the remote core for this recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub time_joined: DateTime<Utc>,
}

pub(crate) fn user_from_core(value: &Value) -> Result<User, AuthError> {
    serde_json::from_value(value.clone())
        .map_err(|e| AuthError::UnexpectedCoreResponse(format!("malformed user object: {e}")))
}

pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    Ok { user: User },
    EmailAlreadyExists,
}

pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    Ok { user: User },
    WrongCredentials,
}

pub struct GetUserByIdInput {
    pub user_id: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

pub struct GetUserByEmailInput {
    pub email: String,
    pub tenant_id: String,
    pub context: RequestContext,
}
