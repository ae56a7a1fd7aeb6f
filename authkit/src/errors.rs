//! Error types shared across the recipe kernel

use thiserror::Error;

use crate::core_client::NetworkError;

/// Errors raised while normalizing user-supplied configuration.
///
/// Configuration errors are surfaced synchronously at `init` time and are
/// fatal to start-up. Each variant names the offending field so the
/// integrator can fix the setting without reading kernel code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was left unset
    #[error("missing required setting `{field}`")]
    Missing { field: &'static str },

    /// A setting was present but rejected by validation
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by the process registry lifecycle
#[derive(Error, Debug)]
pub enum InitError {
    /// `init` was called while the registry is already initialized
    #[error("authkit is already initialized; call reset_for_test before re-initializing")]
    AlreadyInitialized,

    /// An accessor ran before `init`, or asked for a recipe that was not
    /// part of the recipe list. Names what was wanted.
    #[error("authkit is not initialized: {0} is unavailable")]
    NotInitialized(String),

    /// `init` was called with an empty recipe list
    #[error("no recipes were provided to init")]
    NoRecipesProvided,

    /// A recipe constructor rejected its configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Per-request domain error returned by capability-table operations.
///
/// These never escape the dispatch boundary as transport faults; the owning
/// recipe's error-translation hook (or the default mapping) turns them into
/// a structured response.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The remote authentication core could not be reached or answered badly
    #[error("network error: {0}")]
    Network(NetworkError),

    /// The core answered, but not with a shape this recipe understands
    #[error("unexpected response from authentication core: {0}")]
    UnexpectedCoreResponse(String),

    /// The caller is not authenticated for this operation
    #[error("unauthorised: {0}")]
    Unauthorized(String),

    /// The access token has expired and the session should be refreshed
    #[error("try refresh token")]
    TryRefreshToken,

    /// The inbound request was malformed (bad JSON, missing field)
    #[error("bad request: {0}")]
    BadInput(String),

    /// Anything else a capability-table operation wants to raise
    #[error("{0}")]
    General(String),
}

impl From<NetworkError> for AuthError {
    fn from(err: NetworkError) -> Self {
        let error = Self::Network(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<ConfigError>();
        assert_sync_send::<InitError>();
        assert_sync_send::<AuthError>();
    }

    #[test]
    fn test_config_error_display_names_field() {
        let err = ConfigError::Missing { field: "api_domain" };
        assert_eq!(err.to_string(), "missing required setting `api_domain`");

        let err = ConfigError::Invalid {
            field: "issuer",
            reason: "path must match the api base path".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for `issuer`: path must match the api base path"
        );
    }

    #[test]
    fn test_init_error_display() {
        let err = InitError::NotInitialized("session recipe".to_string());
        assert_eq!(
            err.to_string(),
            "authkit is not initialized: session recipe is unavailable"
        );

        let err = InitError::NoRecipesProvided;
        assert_eq!(err.to_string(), "no recipes were provided to init");
    }

    #[test]
    fn test_config_error_into_init_error() {
        let err: InitError = ConfigError::Missing { field: "app_name" }.into();
        if let InitError::Config(inner) = err {
            assert_eq!(inner, ConfigError::Missing { field: "app_name" });
        } else {
            panic!("Wrong error type");
        }
    }

    #[test]
    fn test_network_error_into_auth_error() {
        let net = NetworkError::Transport("connection refused".to_string());
        let err: AuthError = net.into();
        assert!(matches!(err, AuthError::Network(_)));
        assert_eq!(err.to_string(), "network error: request to authentication core failed: connection refused");
    }
}
