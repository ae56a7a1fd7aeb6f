//! Shared helpers for tests: canned app settings and a recording mock for
//! the remote-core request sender.
//!
//! Compiled for this crate's own tests and, behind the `test-utils`
//! feature, for downstream integration tests (the axum crate drives the
//! kernel end-to-end without a live core).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::AppConfig;
use crate::core_client::{NetworkError, RequestSender};
use crate::request::RequestContext;

/// Sparse app config most tests start from
pub fn test_app_config() -> AppConfig {
    AppConfig {
        app_name: Some("TestApp".to_string()),
        api_domain: Some("https://api.test.example".to_string()),
        website_domain: Some("https://test.example".to_string()),
        ..Default::default()
    }
}

/// One call the mock sender observed
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub tenant_id: String,
    /// POST/PUT body, or the GET params as a JSON object
    pub body: Value,
}

/// A [`RequestSender`] that records every call and answers from a canned
/// response table keyed by (method, path). Paths without a canned entry
/// answer `{"status": "OK"}`.
#[derive(Default)]
pub struct MockRequestSender {
    responses: Mutex<HashMap<(&'static str, String), Value>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRequestSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, method: &'static str, path: &str, response: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made against one core path, any method
    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path)
            .cloned()
            .collect()
    }

    fn answer(&self, method: &'static str, path: &str, tenant_id: &str, body: Value) -> Value {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            tenant_id: tenant_id.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or_else(|| json!({"status": "OK"}))
    }
}

#[async_trait]
impl RequestSender for MockRequestSender {
    async fn send_get(
        &self,
        path: &str,
        params: &[(&str, String)],
        tenant_id: &str,
        _context: &RequestContext,
    ) -> Result<Value, NetworkError> {
        let params: serde_json::Map<String, Value> = params
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Ok(self.answer("GET", path, tenant_id, Value::Object(params)))
    }

    async fn send_post(
        &self,
        path: &str,
        body: Value,
        tenant_id: &str,
        _context: &RequestContext,
    ) -> Result<Value, NetworkError> {
        Ok(self.answer("POST", path, tenant_id, body))
    }

    async fn send_put(
        &self,
        path: &str,
        body: Value,
        tenant_id: &str,
        _context: &RequestContext,
    ) -> Result<Value, NetworkError> {
        Ok(self.answer("PUT", path, tenant_id, body))
    }
}
