//! Inputs and outcomes for the JWT recipe

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::RequestContext;

pub struct CreateJwtInput {
    /// Claims to embed; the core adds the registered claims it owns
    pub payload: Value,
    /// Overrides the configured validity when set
    pub validity_seconds: Option<u64>,
    pub tenant_id: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateJwtOutcome {
    Ok { jwt: String },
    /// The core's signing key uses an algorithm this SDK version does not
    /// understand
    UnsupportedAlgorithm,
}

pub struct GetJwksInput {
    pub tenant_id: String,
    pub context: RequestContext,
}

/// One entry of the JSON Web Key Set served by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String,
    pub kid: String,
    pub n: String,
    pub e: String,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<JsonWebKey>,
}
