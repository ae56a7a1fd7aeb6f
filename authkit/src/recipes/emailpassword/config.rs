//! Configuration for the email-password recipe

use crate::errors::ConfigError;
use crate::recipe::Overrides;

use super::api::ApiInterface;
use super::recipe::RecipeInterface;

/// Password length the SDK enforces before talking to the core
pub const DEFAULT_MINIMUM_PASSWORD_LENGTH: usize = 8;

pub type EmailPasswordOverrides = Overrides<RecipeInterface, ApiInterface>;

/// Sparse, integrator-supplied configuration
#[derive(Default)]
pub struct EmailPasswordConfig {
    pub minimum_password_length: Option<usize>,
    pub overrides: EmailPasswordOverrides,
}

/// Fully-populated settings; pure data, immutable after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPasswordSettings {
    pub minimum_password_length: usize,
}

pub(super) fn normalize(config: &EmailPasswordConfig) -> Result<EmailPasswordSettings, ConfigError> {
    let minimum_password_length = config
        .minimum_password_length
        .unwrap_or(DEFAULT_MINIMUM_PASSWORD_LENGTH);
    if minimum_password_length == 0 {
        return Err(ConfigError::Invalid {
            field: "minimum_password_length",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(EmailPasswordSettings {
        minimum_password_length,
    })
}
