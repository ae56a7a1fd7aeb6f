//! Framework-neutral request and response types.
//!
//! The kernel never touches a concrete HTTP server; integrations (see the
//! `authkit-axum` crate) convert their framework's request into an
//! [`ApiRequest`], hand it to the process registry, and convert the
//! [`ApiOutcome`] back.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AuthError;

/// Name of the header carrying the tenant identifier
pub const TENANT_ID_HEADER: &str = "tenant-id";

/// Tenant used when the request does not name one
pub const DEFAULT_TENANT_ID: &str = "public";

/// An inbound HTTP request, already buffered
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute request path, including the application's api base path
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Build from raw URI parts; the query string is parsed into a map
    pub fn from_parts(
        method: Method,
        path: &str,
        raw_query: Option<&str>,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Self {
        let query = raw_query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            method,
            path: path.to_string(),
            query,
            headers,
            body,
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json_body(mut self, body: &Value) -> Self {
        self.body = serde_json::to_vec(body).unwrap_or_default();
        self
    }

    /// Deserialize the body as JSON, surfacing malformed input as
    /// [`AuthError::BadInput`]
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AuthError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AuthError::BadInput(format!("invalid JSON body: {e}")))
    }

    /// First value of a header, when it is valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Tenant this request addresses, defaulting to [`DEFAULT_TENANT_ID`]
    pub fn tenant_id(&self) -> &str {
        self.header(TENANT_ID_HEADER).unwrap_or(DEFAULT_TENANT_ID)
    }
}

/// Body of an [`ApiResponse`]
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

/// An outbound HTTP response produced by an HTTP capability-table slot
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Json(body),
        }
    }

    /// 200 with a JSON body, the common case for recipe endpoints
    pub fn ok_json(body: Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Text(body.into()),
        }
    }

    pub fn with_header(mut self, name: http::header::HeaderName, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        } else {
            tracing::error!("dropping unencodable response header value");
        }
        self
    }

    /// The JSON body, when there is one
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// What dispatching a request through the kernel produced.
///
/// `Passthrough` means the kernel declines the request: no enabled route
/// matched, or the matched slot was cleared by an override. The host
/// application's own handler (or its 404) takes over, so a disabled route is
/// externally indistinguishable from one that never existed.
#[derive(Debug, Clone)]
pub enum ApiOutcome {
    Response(ApiResponse),
    Passthrough,
}

impl ApiOutcome {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough)
    }

    pub fn into_response(self) -> Option<ApiResponse> {
        match self {
            Self::Response(response) => Some(response),
            Self::Passthrough => None,
        }
    }
}

/// Opaque per-request context for cross-cutting metadata.
///
/// Cloning is cheap and all clones share the same map, so an override can
/// stash a value on the way in and an outer layer can read it on the way
/// out. Carries a request id for log correlation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Arc<str>,
    values: Arc<RwLock<HashMap<String, Value>>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string().into(),
            values: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().ok().and_then(|values| values.get(key).cloned())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_json_body_roundtrip() {
        let request = ApiRequest::new(Method::POST, "/auth/signin")
            .with_json_body(&json!({"email": "a@b.c", "password": "pw"}));
        let body: Value = request.json().unwrap();
        assert_eq!(body["email"], "a@b.c");
    }

    #[test]
    fn test_request_json_rejects_garbage() {
        let mut request = ApiRequest::new(Method::POST, "/auth/signin");
        request.body = b"not json".to_vec();
        let err = request.json::<Value>().unwrap_err();
        assert!(matches!(err, AuthError::BadInput(_)));
    }

    #[test]
    fn test_from_parts_parses_query() {
        let request = ApiRequest::from_parts(
            Method::GET,
            "/auth/signup/email/exists",
            Some("email=a%40b.c&x=1"),
            HeaderMap::new(),
            Vec::new(),
        );
        assert_eq!(request.query.get("email").map(String::as_str), Some("a@b.c"));
        assert_eq!(request.query.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_tenant_defaults_to_public() {
        let request = ApiRequest::new(Method::GET, "/auth/jwt/jwks.json");
        assert_eq!(request.tenant_id(), DEFAULT_TENANT_ID);

        let mut request = ApiRequest::new(Method::GET, "/auth/jwt/jwks.json");
        request
            .headers
            .insert(TENANT_ID_HEADER, "customer1".parse().unwrap());
        assert_eq!(request.tenant_id(), "customer1");
    }

    #[test]
    fn test_context_is_shared_between_clones() {
        let context = RequestContext::new();
        let clone = context.clone();
        clone.insert("seen", json!(true));
        assert_eq!(context.get("seen"), Some(json!(true)));
        assert_eq!(context.request_id(), clone.request_id());
    }
}
