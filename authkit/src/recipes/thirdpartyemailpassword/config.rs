//! Configuration for the third-party-email-password recipe.
//!
//! Overriding a sub-recipe is configured independently of overriding the
//! composer: the `email_password` and `third_party` sub-fields carry the
//! override records handed to the respective sub-recipes, layered on top
//! of the adapter-derived implementations.

use crate::errors::ConfigError;
use crate::recipe::OverrideFn;
use crate::recipes::emailpassword::{DEFAULT_MINIMUM_PASSWORD_LENGTH, EmailPasswordOverrides};
use crate::recipes::thirdparty::{ProviderConfig, ThirdPartyOverrides};

use super::recipe::{ApiInterface, RecipeInterface};

pub struct TpepOverrides {
    pub functions: Option<OverrideFn<RecipeInterface>>,
    pub apis: Option<OverrideFn<ApiInterface>>,
    /// Overrides for the embedded email-password recipe
    pub email_password: EmailPasswordOverrides,
    /// Overrides for the embedded third-party recipe
    pub third_party: ThirdPartyOverrides,
}

impl Default for TpepOverrides {
    fn default() -> Self {
        Self {
            functions: None,
            apis: None,
            email_password: EmailPasswordOverrides::default(),
            third_party: ThirdPartyOverrides::default(),
        }
    }
}

#[derive(Default)]
pub struct TpepConfig {
    pub minimum_password_length: Option<usize>,
    pub providers: Vec<ProviderConfig>,
    pub overrides: TpepOverrides,
}

/// Sub-recipe constructors re-validate their slices; this mirror exists so
/// the composer's settings are inspectable as plain data like every other
/// recipe's
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TpepSettings {
    pub minimum_password_length: usize,
    pub providers: Vec<ProviderConfig>,
}

pub(super) fn normalize(config: &TpepConfig) -> Result<TpepSettings, ConfigError> {
    Ok(TpepSettings {
        minimum_password_length: config
            .minimum_password_length
            .unwrap_or(DEFAULT_MINIMUM_PASSWORD_LENGTH),
        providers: config.providers.clone(),
    })
}
