//! Types for the OpenID recipe

use serde::{Deserialize, Serialize};

use crate::request::RequestContext;

pub struct GetDiscoveryConfigurationInput {
    pub tenant_id: String,
    pub context: RequestContext,
}

/// The subset of the OpenID provider metadata this SDK serves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfiguration {
    pub issuer: String,
    pub jwks_uri: String,
}
