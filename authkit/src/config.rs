//! Application-level configuration and the normalization helpers shared by
//! every recipe's config normalizer.
//!
//! Normalization is a pure function from a sparse, user-supplied config to a
//! fully-populated settings struct: the same input always yields the same
//! output, and no network or disk access happens here.

use url::Url;

use crate::errors::ConfigError;

/// Default mount point for every recipe's routes
pub const DEFAULT_API_BASE_PATH: &str = "/auth";

/// Default base path of the hosted auth UI on the website domain
pub const DEFAULT_WEBSITE_BASE_PATH: &str = "/auth";

/// Sparse application settings as supplied by the integrator.
///
/// Every field is optional; [`AppSettings::normalize`] fills defaults and
/// rejects unusable values with a [`ConfigError`] naming the field.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub app_name: Option<String>,
    pub api_domain: Option<String>,
    pub website_domain: Option<String>,
    pub api_base_path: Option<String>,
    pub website_base_path: Option<String>,
}

/// Fully-populated application settings, built once at `init` and immutable
/// for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub app_name: String,
    pub api_domain: NormalizedDomain,
    pub website_domain: NormalizedDomain,
    pub api_base_path: NormalizedPath,
    pub website_base_path: NormalizedPath,
}

impl AppSettings {
    /// Normalize a sparse [`AppConfig`] into settings every recipe can rely on.
    pub fn normalize(config: &AppConfig) -> Result<Self, ConfigError> {
        let app_name = config
            .app_name
            .clone()
            .ok_or(ConfigError::Missing { field: "app_name" })?;
        if app_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "app_name",
                reason: "must not be empty".to_string(),
            });
        }

        let api_domain = NormalizedDomain::parse(
            config
                .api_domain
                .as_deref()
                .ok_or(ConfigError::Missing { field: "api_domain" })?,
            "api_domain",
        )?;
        let website_domain = NormalizedDomain::parse(
            config
                .website_domain
                .as_deref()
                .ok_or(ConfigError::Missing {
                    field: "website_domain",
                })?,
            "website_domain",
        )?;

        let api_base_path = NormalizedPath::parse(
            config.api_base_path.as_deref().unwrap_or(DEFAULT_API_BASE_PATH),
            "api_base_path",
        )?;
        let website_base_path = NormalizedPath::parse(
            config
                .website_base_path
                .as_deref()
                .unwrap_or(DEFAULT_WEBSITE_BASE_PATH),
            "website_base_path",
        )?;

        Ok(Self {
            app_name,
            api_domain,
            website_domain,
            api_base_path,
            website_base_path,
        })
    }
}

/// An origin (`scheme://host[:port]`) with any path stripped.
///
/// A missing scheme defaults to `https`, matching what integrators usually
/// mean when they write a bare hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDomain(String);

impl NormalizedDomain {
    pub fn parse(input: &str, field: &'static str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid {
                field,
                reason: "must not be empty".to_string(),
            });
        }
        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let url = Url::parse(&candidate).map_err(|e| ConfigError::Invalid {
            field,
            reason: e.to_string(),
        })?;
        let host = url.host_str().ok_or_else(|| ConfigError::Invalid {
            field,
            reason: "no host in URL".to_string(),
        })?;
        let origin = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };
        Ok(Self(origin))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A URL path with a leading slash and no trailing slash; the root path is
/// the empty string so that joining never produces `//`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn parse(input: &str, field: &'static str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field,
                reason: "must not contain whitespace".to_string(),
            });
        }
        if trimmed.contains("://") || trimmed.contains('?') || trimmed.contains('#') {
            return Err(ConfigError::Invalid {
                field,
                reason: "must be a path, not a full URL".to_string(),
            });
        }
        Ok(Self(Self::normalize(trimmed)))
    }

    fn normalize(path: &str) -> String {
        let mut out = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            out.push('/');
            out.push_str(segment);
        }
        out
    }

    /// Join a route path onto this base path
    pub fn join(&self, suffix: &str) -> String {
        let joined = format!("{}{}", self.0, Self::normalize(suffix));
        if joined.is_empty() { "/".to_string() } else { joined }
    }

    /// `""` for the root path, otherwise `/segment[/segment..]`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip this base path off the front of a request path, returning the
    /// remainder in normalized form. `None` when the path is not under this
    /// base.
    pub fn strip_from(&self, request_path: &str) -> Option<String> {
        let normalized = Self::normalize(request_path);
        let rest = normalized.strip_prefix(self.0.as_str())?;
        if rest.is_empty() {
            return Some(String::new());
        }
        // "/authx" must not match a base path of "/auth"
        if !rest.starts_with('/') {
            return None;
        }
        Some(rest.to_string())
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse() -> AppConfig {
        AppConfig {
            app_name: Some("Demo App".to_string()),
            api_domain: Some("api.example.com".to_string()),
            website_domain: Some("https://example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let settings = AppSettings::normalize(&sparse()).unwrap();
        assert_eq!(settings.api_domain.as_str(), "https://api.example.com");
        assert_eq!(settings.website_domain.as_str(), "https://example.com");
        assert_eq!(settings.api_base_path.as_str(), "/auth");
        assert_eq!(settings.website_base_path.as_str(), "/auth");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let a = AppSettings::normalize(&sparse()).unwrap();
        let b = AppSettings::normalize(&sparse()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_required_field_names_it() {
        let mut config = sparse();
        config.api_domain = None;
        let err = AppSettings::normalize(&config).unwrap_err();
        assert_eq!(err, ConfigError::Missing { field: "api_domain" });
    }

    #[test]
    fn test_domain_keeps_port_and_strips_path() {
        let domain = NormalizedDomain::parse("http://localhost:3001/ignored", "api_domain").unwrap();
        assert_eq!(domain.as_str(), "http://localhost:3001");
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(NormalizedPath::parse("/auth/", "p").unwrap().as_str(), "/auth");
        assert_eq!(NormalizedPath::parse("auth", "p").unwrap().as_str(), "/auth");
        assert_eq!(NormalizedPath::parse("/", "p").unwrap().as_str(), "");
        assert_eq!(
            NormalizedPath::parse("//a//b/", "p").unwrap().as_str(),
            "/a/b"
        );
    }

    #[test]
    fn test_path_rejects_full_url() {
        let err = NormalizedPath::parse("https://example.com/auth", "api_base_path").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "api_base_path", .. }));
    }

    #[test]
    fn test_join_and_strip_roundtrip() {
        let base = NormalizedPath::parse("/auth", "p").unwrap();
        assert_eq!(base.join("/signin"), "/auth/signin");
        assert_eq!(base.strip_from("/auth/signin").as_deref(), Some("/signin"));
        assert_eq!(base.strip_from("/auth/signin/"), Some("/signin".to_string()));
        assert_eq!(base.strip_from("/authx/signin"), None);
        assert_eq!(base.strip_from("/other"), None);
        assert_eq!(base.strip_from("/auth"), Some(String::new()));
    }

    #[test]
    fn test_root_base_path_matches_everything_under_root() {
        let base = NormalizedPath::parse("/", "p").unwrap();
        assert_eq!(base.join("/signin"), "/signin");
        assert_eq!(base.strip_from("/signin").as_deref(), Some("/signin"));
    }
}
