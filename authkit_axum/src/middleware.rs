//! The axum middleware that feeds requests through the authkit kernel.
//!
//! Requests under the app's api base path are buffered, converted into the
//! kernel's neutral request type, and dispatched. When the kernel answers
//! `Passthrough` — no recipe matched, or the matched slot was disabled —
//! the original request is rebuilt and handed to the inner service, so the
//! host application's own routes and 404 behavior are preserved
//! unchanged.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;

use authkit::{ApiOutcome, ApiRequest, ApiResponse, ProcessRegistry, ResponseBody};

/// Requests above this size are rejected before dispatch; recipe payloads
/// are small JSON documents
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Mount the authkit dispatcher in front of a router
pub fn with_authkit(router: Router, registry: Arc<ProcessRegistry>) -> Router {
    router.layer(axum::middleware::from_fn_with_state(
        registry,
        authkit_middleware,
    ))
}

/// The middleware itself, for hosts that prefer to compose layers manually
pub async fn authkit_middleware(
    State(registry): State<Arc<ProcessRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    // Anything outside the api base path is none of our business
    let path = request.uri().path().to_string();
    if registry.app().api_base_path.strip_from(&path).is_none() {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to buffer request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
        }
    };

    let api_request = ApiRequest::from_parts(
        parts.method.clone(),
        parts.uri.path(),
        parts.uri.query(),
        parts.headers.clone(),
        bytes.to_vec(),
    );

    match registry.handle(api_request).await {
        ApiOutcome::Response(response) => into_axum_response(response),
        ApiOutcome::Passthrough => {
            let request = Request::from_parts(parts, Body::from(bytes));
            next.run(request).await
        }
    }
}

fn into_axum_response(response: ApiResponse) -> Response {
    let ApiResponse {
        status,
        headers,
        body,
    } = response;
    let mut axum_response = match body {
        ResponseBody::Json(value) => (status, axum::Json(value)).into_response(),
        ResponseBody::Text(text) => (status, text).into_response(),
        ResponseBody::Empty => status.into_response(),
    };
    axum_response.headers_mut().extend(headers);
    axum_response
}
