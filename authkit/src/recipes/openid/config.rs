//! Configuration for the OpenID recipe.
//!
//! The override record carries a `jwt` sub-field so the embedded JWT
//! recipe can be overridden independently of the composer.

use url::Url;

use crate::config::{AppSettings, NormalizedPath};
use crate::errors::ConfigError;
use crate::recipe::OverrideFn;
use crate::recipes::jwt::JwtOverrides;

use super::api::ApiInterface;
use super::recipe::RecipeInterface;

pub struct OpenIdOverrides {
    pub functions: Option<OverrideFn<RecipeInterface>>,
    pub apis: Option<OverrideFn<ApiInterface>>,
    /// Override record handed to the embedded JWT sub-recipe
    pub jwt: JwtOverrides,
}

impl Default for OpenIdOverrides {
    fn default() -> Self {
        Self {
            functions: None,
            apis: None,
            jwt: JwtOverrides::default(),
        }
    }
}

#[derive(Default)]
pub struct OpenIdConfig {
    /// Issuer URL advertised in the discovery document and injected into
    /// every token this recipe mints. Defaults to the app's api domain
    /// plus the api base path.
    pub issuer: Option<String>,
    /// Forwarded to the embedded JWT recipe
    pub jwt_validity_seconds: Option<u64>,
    pub overrides: OpenIdOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenIdSettings {
    pub issuer: String,
}

pub(super) fn normalize(
    config: &OpenIdConfig,
    app: &AppSettings,
) -> Result<OpenIdSettings, ConfigError> {
    let issuer = match config.issuer.as_deref() {
        None => format!("{}{}", app.api_domain.as_str(), app.api_base_path.as_str()),
        Some(raw) => {
            let candidate = if raw.contains("://") {
                raw.to_string()
            } else {
                format!("https://{raw}")
            };
            let url = Url::parse(&candidate).map_err(|e| ConfigError::Invalid {
                field: "issuer",
                reason: e.to_string(),
            })?;
            let path = NormalizedPath::parse(url.path(), "issuer")?;
            // The issuer must point at wherever this SDK actually serves
            // its routes, or relying parties resolve a dead JWKS URI
            if path != app.api_base_path {
                return Err(ConfigError::Invalid {
                    field: "issuer",
                    reason: format!(
                        "issuer path `{}` must equal the api base path `{}`",
                        path, app.api_base_path
                    ),
                });
            }
            let host = url.host_str().ok_or_else(|| ConfigError::Invalid {
                field: "issuer",
                reason: "no host in URL".to_string(),
            })?;
            let origin = match url.port() {
                Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
                None => format!("{}://{}", url.scheme(), host),
            };
            format!("{}{}", origin, path.as_str())
        }
    };
    Ok(OpenIdSettings { issuer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_app_config;

    fn app() -> AppSettings {
        AppSettings::normalize(&test_app_config()).unwrap()
    }

    #[test]
    fn test_issuer_defaults_to_api_domain_plus_base_path() {
        let settings = normalize(&OpenIdConfig::default(), &app()).unwrap();
        assert_eq!(settings.issuer, "https://api.test.example/auth");
    }

    #[test]
    fn test_custom_issuer_with_matching_path_is_kept() {
        let settings = normalize(
            &OpenIdConfig {
                issuer: Some("https://tokens.test.example/auth/".to_string()),
                ..Default::default()
            },
            &app(),
        )
        .unwrap();
        assert_eq!(settings.issuer, "https://tokens.test.example/auth");
    }

    #[test]
    fn test_issuer_path_must_match_api_base_path() {
        let err = normalize(
            &OpenIdConfig {
                issuer: Some("https://tokens.test.example/other".to_string()),
                ..Default::default()
            },
            &app(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "issuer", .. }));
    }
}
