//! CORS layer built from the kernel's per-recipe header contributions

use http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE};
use tower_http::cors::{AllowOrigin, CorsLayer};

use authkit::ProcessRegistry;

/// A [`CorsLayer`] allowing the app's website origin and every header the
/// registered recipes require (plus `content-type`)
pub fn cors_layer(registry: &ProcessRegistry) -> CorsLayer {
    let mut allow_headers = vec![CONTENT_TYPE];
    for header in registry.cors_allowed_headers() {
        match header.parse::<HeaderName>() {
            Ok(name) => allow_headers.push(name),
            Err(_) => tracing::warn!(header, "skipping unencodable CORS header name"),
        }
    }

    let origin = match HeaderValue::from_str(registry.app().website_domain.as_str()) {
        Ok(value) => AllowOrigin::exact(value),
        // Normalized domains are plain ASCII, so this is unreachable in
        // practice; fall back to mirroring rather than panicking
        Err(_) => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(allow_headers)
        .allow_credentials(true)
}
