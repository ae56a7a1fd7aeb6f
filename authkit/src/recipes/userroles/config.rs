//! Configuration for the user-roles recipe

use crate::errors::ConfigError;
use crate::recipe::Overrides;

use super::recipe::{ApiInterface, RecipeInterface};

pub type UserRolesOverrides = Overrides<RecipeInterface, ApiInterface>;

#[derive(Default)]
pub struct UserRolesConfig {
    /// When set, session payloads minted elsewhere skip embedding the
    /// user's role list
    pub skip_adding_roles_to_access_token: Option<bool>,
    pub overrides: UserRolesOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRolesSettings {
    pub skip_adding_roles_to_access_token: bool,
}

pub(super) fn normalize(config: &UserRolesConfig) -> Result<UserRolesSettings, ConfigError> {
    Ok(UserRolesSettings {
        skip_adding_roles_to_access_token: config
            .skip_adding_roles_to_access_token
            .unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = normalize(&UserRolesConfig::default()).unwrap();
        assert!(!settings.skip_adding_roles_to_access_token);
    }
}
