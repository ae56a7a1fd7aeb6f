//! Configuration for the session recipe

use crate::errors::ConfigError;
use crate::recipe::Overrides;

use super::api::ApiInterface;
use super::recipe::RecipeInterface;

pub const DEFAULT_SESSION_EXPIRED_STATUS_CODE: u16 = 401;

/// How the SDK expects anti-CSRF proof to travel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntiCsrfMode {
    /// The host sends the token back in the `anti-csrf` request header
    ViaCustomHeader,
    /// No anti-CSRF check (e.g. header-based auth only)
    Disabled,
}

pub type SessionOverrides = Overrides<RecipeInterface, ApiInterface>;

#[derive(Default)]
pub struct SessionConfig {
    pub session_expired_status_code: Option<u16>,
    pub anti_csrf: Option<AntiCsrfMode>,
    pub overrides: SessionOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub session_expired_status_code: u16,
    pub anti_csrf: AntiCsrfMode,
}

pub(super) fn normalize(config: &SessionConfig) -> Result<SessionSettings, ConfigError> {
    let session_expired_status_code = config
        .session_expired_status_code
        .unwrap_or(DEFAULT_SESSION_EXPIRED_STATUS_CODE);
    if !(400..=599).contains(&session_expired_status_code) {
        return Err(ConfigError::Invalid {
            field: "session_expired_status_code",
            reason: format!("{session_expired_status_code} is not an HTTP error status"),
        });
    }
    Ok(SessionSettings {
        session_expired_status_code,
        anti_csrf: config.anti_csrf.unwrap_or(AntiCsrfMode::ViaCustomHeader),
    })
}
