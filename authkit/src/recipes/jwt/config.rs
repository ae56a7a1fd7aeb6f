//! Configuration for the JWT recipe

use crate::config::AppSettings;
use crate::errors::ConfigError;
use crate::recipe::Overrides;

use super::api::ApiInterface;
use super::recipe::RecipeInterface;

/// 100 years; the core enforces its own ceiling
pub const DEFAULT_JWT_VALIDITY_SECONDS: u64 = 3_153_600_000;

pub type JwtOverrides = Overrides<RecipeInterface, ApiInterface>;

#[derive(Default)]
pub struct JwtConfig {
    pub jwt_validity_seconds: Option<u64>,
    pub overrides: JwtOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtSettings {
    pub jwt_validity_seconds: u64,
    /// Domain the core embeds in the JWKS endpoint it advertises; derived
    /// from the app's api domain
    pub jwks_domain: String,
}

pub(super) fn normalize(config: &JwtConfig, app: &AppSettings) -> Result<JwtSettings, ConfigError> {
    let jwt_validity_seconds = config
        .jwt_validity_seconds
        .unwrap_or(DEFAULT_JWT_VALIDITY_SECONDS);
    if jwt_validity_seconds == 0 {
        return Err(ConfigError::Invalid {
            field: "jwt_validity_seconds",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(JwtSettings {
        jwt_validity_seconds,
        jwks_domain: app.api_domain.as_str().to_string(),
    })
}
