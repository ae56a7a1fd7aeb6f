//! Client for the remote authentication core.
//!
//! The kernel consumes the core through the [`RequestSender`] trait only:
//! programmatic capability-table defaults call `send_get`/`send_post`/
//! `send_put` and parse the JSON the core answers with. Retry and
//! host-failover policy belong to the core deployment, not to this client,
//! which sends each request exactly once.

mod errors;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::errors::ConfigError;
use crate::request::RequestContext;

pub use errors::NetworkError;

/// Header carrying the shared secret, when one is configured
const API_KEY_HEADER: &str = "api-key";

/// Header correlating core calls with the inbound request that caused them
const REQUEST_ID_HEADER: &str = "request-id";

/// Connection settings for the remote core
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    /// Base URI of the core deployment, e.g. `https://core.example.com`
    pub connection_uri: Option<String>,
    /// Optional shared secret sent with every request
    pub api_key: Option<String>,
}

/// Generic request sender the capability-table defaults are written
/// against. Tests substitute a recording mock; production uses
/// [`CoreClient`].
#[async_trait]
pub trait RequestSender: Send + Sync {
    async fn send_get(
        &self,
        path: &str,
        params: &[(&str, String)],
        tenant_id: &str,
        context: &RequestContext,
    ) -> Result<Value, NetworkError>;

    async fn send_post(
        &self,
        path: &str,
        body: Value,
        tenant_id: &str,
        context: &RequestContext,
    ) -> Result<Value, NetworkError>;

    async fn send_put(
        &self,
        path: &str,
        body: Value,
        tenant_id: &str,
        context: &RequestContext,
    ) -> Result<Value, NetworkError>;
}

/// reqwest-backed [`RequestSender`] talking JSON to the core
pub struct CoreClient {
    base: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl std::fmt::Debug for CoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreClient")
            .field("base", &self.base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CoreClient {
    pub fn new(config: &CoreConfig) -> Result<Self, ConfigError> {
        let uri = config
            .connection_uri
            .as_deref()
            .ok_or(ConfigError::Missing {
                field: "connection_uri",
            })?;
        let parsed = Url::parse(uri).map_err(|e| ConfigError::Invalid {
            field: "connection_uri",
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "connection_uri",
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        Ok(Self {
            base: uri.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http: reqwest::Client::new(),
        })
    }

    /// Core paths are tenant-prefixed: `/{tenant}/recipe/...`
    fn endpoint(&self, tenant_id: &str, path: &str) -> String {
        format!("{}/{}{}", self.base, tenant_id, path)
    }

    fn decorate(&self, request: reqwest::RequestBuilder, context: &RequestContext) -> reqwest::RequestBuilder {
        let request = request.header(REQUEST_ID_HEADER, context.request_id());
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, NetworkError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| NetworkError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RequestSender for CoreClient {
    async fn send_get(
        &self,
        path: &str,
        params: &[(&str, String)],
        tenant_id: &str,
        context: &RequestContext,
    ) -> Result<Value, NetworkError> {
        let url = self.endpoint(tenant_id, path);
        tracing::debug!(request_id = context.request_id(), %url, "core GET");
        let response = self
            .decorate(self.http.get(&url).query(params), context)
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn send_post(
        &self,
        path: &str,
        body: Value,
        tenant_id: &str,
        context: &RequestContext,
    ) -> Result<Value, NetworkError> {
        let url = self.endpoint(tenant_id, path);
        tracing::debug!(request_id = context.request_id(), %url, "core POST");
        let response = self
            .decorate(self.http.post(&url).json(&body), context)
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn send_put(
        &self,
        path: &str,
        body: Value,
        tenant_id: &str,
        context: &RequestContext,
    ) -> Result<Value, NetworkError> {
        let url = self.endpoint(tenant_id, path);
        tracing::debug!(request_id = context.request_id(), %url, "core PUT");
        let response = self
            .decorate(self.http.put(&url).json(&body), context)
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(uri: &str) -> CoreClient {
        CoreClient::new(&CoreConfig {
            connection_uri: Some(uri.to_string()),
            api_key: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_is_tenant_prefixed() {
        let client = client("https://core.example.com");
        assert_eq!(
            client.endpoint("public", "/recipe/signin"),
            "https://core.example.com/public/recipe/signin"
        );
        assert_eq!(
            client.endpoint("customer1", "/recipe/jwt/jwks"),
            "https://core.example.com/customer1/recipe/jwt/jwks"
        );
    }

    #[test]
    fn test_trailing_slash_in_connection_uri_is_tolerated() {
        let client = client("http://localhost:3567/");
        assert_eq!(
            client.endpoint("public", "/recipe/session"),
            "http://localhost:3567/public/recipe/session"
        );
    }

    #[test]
    fn test_missing_connection_uri_is_a_config_error() {
        let err = CoreClient::new(&CoreConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                field: "connection_uri"
            }
        );
    }

    #[test]
    fn test_bad_scheme_is_rejected() {
        let err = CoreClient::new(&CoreConfig {
            connection_uri: Some("ftp://core.example.com".to_string()),
            api_key: None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "connection_uri",
                ..
            }
        ));
    }
}
