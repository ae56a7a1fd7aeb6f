//! Inputs and outcomes for the session recipe

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AuthError;
use crate::request::RequestContext;

/// A live session as minted by the remote core. Token values are opaque
/// strings; verification and signing happen core-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub handle: String,
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub access_token_payload: Value,
}

pub(crate) fn session_from_core(value: &Value) -> Result<Session, AuthError> {
    serde_json::from_value(value.clone())
        .map_err(|e| AuthError::UnexpectedCoreResponse(format!("malformed session object: {e}")))
}

pub struct CreateSessionInput {
    pub user_id: String,
    pub access_token_payload: Value,
    pub tenant_id: String,
    pub context: RequestContext,
}

pub struct GetSessionInput {
    pub access_token: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

pub struct RefreshSessionInput {
    pub refresh_token: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

pub struct RevokeSessionInput {
    pub session_handle: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

pub struct RevokeAllSessionsInput {
    pub user_id: String,
    pub tenant_id: String,
    pub context: RequestContext,
}
