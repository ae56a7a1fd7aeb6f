//! Unified types for the third-party-email-password recipe.
//!
//! The unified user and the credential union are what make the adapters
//! total: every branch of [`SignInUpCredentials`] and every branch of
//! [`SignInUpOutcome`] maps to exactly one case of one of the two
//! sub-recipes' narrower shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AuthError;
use crate::recipes::thirdparty::ThirdPartyInfo;
use crate::request::RequestContext;

/// A user of either provenance; `third_party` is `None` for
/// password-based accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub time_joined: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party: Option<ThirdPartyInfo>,
}

pub(crate) fn user_from_core(value: &Value) -> Result<User, AuthError> {
    serde_json::from_value(value.clone())
        .map_err(|e| AuthError::UnexpectedCoreResponse(format!("malformed user object: {e}")))
}

/// The credential union behind the unified "sign in or up" operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInUpCredentials {
    EmailPasswordSignUp {
        email: String,
        password: String,
    },
    EmailPasswordSignIn {
        email: String,
        password: String,
    },
    ThirdParty {
        third_party_id: String,
        third_party_user_id: String,
        email: String,
    },
}

pub struct SignInUpInput {
    pub credentials: SignInUpCredentials,
    pub tenant_id: String,
    pub context: RequestContext,
}

/// Unified outcome; the credential-specific branches only occur for the
/// matching credential variant, which is what the adapters' impossible
/// arms assert
#[derive(Debug, Clone, PartialEq)]
pub enum SignInUpOutcome {
    Ok { created_new_user: bool, user: User },
    EmailAlreadyExists,
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
