//! End-to-end tests for the registry lifecycle and top-level dispatch,
//! exercising several recipes together the way an integration would.

use std::sync::{Arc, Mutex};

use http::Method;
use serde_json::json;

use crate::errors::InitError;
use crate::recipe::RecipeInit;
use crate::registry::{self, ProcessRegistry};
use crate::request::ApiRequest;
use crate::recipes::{emailpassword, jwt, session};
use crate::test_utils::{MockRequestSender, test_app_config};

use serial_test::serial;

fn registry_with(
    sender: Arc<MockRequestSender>,
    recipes: Vec<RecipeInit>,
) -> ProcessRegistry {
    ProcessRegistry::build_with_sender(test_app_config(), recipes, sender).unwrap()
}

fn signin_request() -> ApiRequest {
    ApiRequest::new(Method::POST, "/auth/signin")
        .with_json_body(&json!({"email": "a@b.c", "password": "password123"}))
}

fn core_user() -> serde_json::Value {
    json!({"id": "user-1", "email": "a@b.c", "timeJoined": "2026-01-05T10:00:00Z"})
}

#[tokio::test]
async fn test_dispatch_routes_to_owning_recipe() {
    let sender = Arc::new(MockRequestSender::new().respond_with(
        "POST",
        "/recipe/signin",
        json!({"status": "OK", "user": core_user()}),
    ));
    let registry = registry_with(
        sender.clone(),
        vec![
            emailpassword::init(Default::default()),
            jwt::init(Default::default()),
        ],
    );
    let outcome = registry.handle(signin_request()).await;
    let response = outcome.into_response().unwrap();
    assert_eq!(response.json_body().unwrap()["status"], "OK");
}

#[tokio::test]
async fn test_paths_outside_base_path_pass_through() {
    let registry = registry_with(
        Arc::new(MockRequestSender::new()),
        vec![emailpassword::init(Default::default())],
    );
    let outcome = registry
        .handle(ApiRequest::new(Method::POST, "/api/orders"))
        .await;
    assert!(outcome.is_passthrough());

    let outcome = registry
        .handle(ApiRequest::new(Method::POST, "/auth/unknown"))
        .await;
    assert!(outcome.is_passthrough());
}

#[tokio::test]
async fn test_method_mismatch_passes_through() {
    let registry = registry_with(
        Arc::new(MockRequestSender::new()),
        vec![emailpassword::init(Default::default())],
    );
    let outcome = registry
        .handle(ApiRequest::new(Method::GET, "/auth/signin"))
        .await;
    assert!(outcome.is_passthrough());
}

/// A route disabled by an override answers exactly like a route that
/// never existed
#[tokio::test]
async fn test_disabled_route_equals_missing_route() {
    let config = emailpassword::EmailPasswordConfig {
        overrides: emailpassword::EmailPasswordOverrides {
            apis: Some(Box::new(|mut api: emailpassword::ApiInterface| {
                api.sign_in_post = None;
                api
            })),
            ..Default::default()
        },
        ..Default::default()
    };
    let registry = registry_with(
        Arc::new(MockRequestSender::new()),
        vec![emailpassword::init(config)],
    );

    let disabled = registry.handle(signin_request()).await;
    let missing = registry
        .handle(ApiRequest::new(Method::POST, "/auth/no-such-route"))
        .await;
    assert!(disabled.is_passthrough());
    assert!(missing.is_passthrough());
}

/// Two recipes with disjoint routes: dispatching the second recipe's path
/// never invokes the first recipe's table
#[tokio::test]
async fn test_first_recipe_untouched_when_second_matches() {
    let first_recipe_hits = Arc::new(Mutex::new(0usize));
    let hits = first_recipe_hits.clone();
    let ep_config = emailpassword::EmailPasswordConfig {
        overrides: emailpassword::EmailPasswordOverrides {
            apis: Some(Box::new(move |mut api: emailpassword::ApiInterface| {
                let hits = hits.clone();
                for slot in [
                    &mut api.sign_up_post,
                    &mut api.sign_in_post,
                    &mut api.email_exists_get,
                ] {
                    let Some(original) = slot.take() else { continue };
                    let hits = hits.clone();
                    *slot = Some(Arc::new(move |options| {
                        *hits.lock().unwrap() += 1;
                        original(options)
                    }));
                }
                api
            })),
            ..Default::default()
        },
        ..Default::default()
    };

    let sender = Arc::new(MockRequestSender::new().respond_with(
        "GET",
        "/recipe/jwt/jwks",
        json!({"status": "OK", "keys": []}),
    ));
    let registry = registry_with(
        sender,
        vec![emailpassword::init(ep_config), jwt::init(Default::default())],
    );

    let outcome = registry
        .handle(ApiRequest::new(Method::GET, "/auth/jwt/jwks.json"))
        .await;
    assert!(outcome.into_response().is_some());
    assert_eq!(*first_recipe_hits.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_tenant_header_reaches_the_core() {
    let sender = Arc::new(MockRequestSender::new().respond_with(
        "POST",
        "/recipe/signin",
        json!({"status": "OK", "user": core_user()}),
    ));
    let registry = registry_with(sender.clone(), vec![emailpassword::init(Default::default())]);

    let mut request = signin_request();
    request
        .headers
        .insert(crate::request::TENANT_ID_HEADER, "customer1".parse().unwrap());
    registry.handle(request).await;

    let calls = sender.calls_to("/recipe/signin");
    assert_eq!(calls[0].tenant_id, "customer1");
}

#[tokio::test]
async fn test_session_errors_use_the_recipe_translation_hook() {
    let sender = Arc::new(MockRequestSender::new().respond_with(
        "POST",
        "/recipe/session/refresh",
        json!({"status": "UNAUTHORISED"}),
    ));
    let registry = registry_with(sender, vec![session::init(Default::default())]);

    let mut request = ApiRequest::new(Method::POST, "/auth/session/refresh");
    request
        .headers
        .insert(session::REFRESH_TOKEN_HEADER, "stale".parse().unwrap());
    let outcome = registry.handle(request).await;
    let response = outcome.into_response().unwrap();
    assert_eq!(response.status.as_u16(), 401);
    assert_eq!(response.json_body().unwrap()["message"], "unauthorised");
}

#[tokio::test]
async fn test_malformed_body_maps_to_bad_request() {
    let registry = registry_with(
        Arc::new(MockRequestSender::new()),
        vec![emailpassword::init(Default::default())],
    );
    let mut request = ApiRequest::new(Method::POST, "/auth/signin");
    request.body = b"not json".to_vec();
    let outcome = registry.handle(request).await;
    let response = outcome.into_response().unwrap();
    assert_eq!(response.status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_headers_are_the_union_of_recipe_contributions() {
    let registry = registry_with(
        Arc::new(MockRequestSender::new()),
        vec![
            emailpassword::init(Default::default()),
            session::init(Default::default()),
        ],
    );
    assert_eq!(
        registry.cors_allowed_headers(),
        vec!["tenant-id".to_string(), "anti-csrf".to_string()]
    );
}

#[test]
fn test_empty_recipe_list_is_rejected() {
    let err = ProcessRegistry::build_with_sender(
        test_app_config(),
        Vec::new(),
        Arc::new(MockRequestSender::new()),
    )
    .unwrap_err();
    assert!(matches!(err, InitError::NoRecipesProvided));
}

#[test]
#[serial]
fn test_init_twice_fails_until_reset() {
    registry::reset_for_test();

    registry::init_with_sender(
        test_app_config(),
        vec![emailpassword::init(Default::default())],
        Arc::new(MockRequestSender::new()),
    )
    .unwrap();

    let err = registry::init_with_sender(
        test_app_config(),
        vec![emailpassword::init(Default::default())],
        Arc::new(MockRequestSender::new()),
    )
    .unwrap_err();
    assert!(matches!(err, InitError::AlreadyInitialized));

    registry::reset_for_test();
    registry::init_with_sender(
        test_app_config(),
        vec![emailpassword::init(Default::default())],
        Arc::new(MockRequestSender::new()),
    )
    .unwrap();
    registry::reset_for_test();
}

#[test]
#[serial]
fn test_accessors_after_reset_fail_naming_what_was_wanted() {
    registry::reset_for_test();

    let err = registry::instance().unwrap_err();
    assert!(matches!(err, InitError::NotInitialized(_)));

    let err = emailpassword::EmailPasswordRecipe::instance().unwrap_err();
    assert_eq!(
        err.to_string(),
        "authkit is not initialized: the emailpassword recipe is unavailable"
    );
}

#[test]
#[serial]
fn test_recipe_instance_accessor_finds_registered_recipe() {
    registry::reset_for_test();
    registry::init_with_sender(
        test_app_config(),
        vec![
            emailpassword::init(Default::default()),
            session::init(session::SessionConfig {
                session_expired_status_code: Some(440),
                ..Default::default()
            }),
        ],
        Arc::new(MockRequestSender::new()),
    )
    .unwrap();

    let session = session::SessionRecipe::instance().unwrap();
    assert_eq!(session.settings().session_expired_status_code, 440);

    // Registered recipes only: jwt was not in the list
    let err = jwt::JwtRecipe::instance().unwrap_err();
    assert!(matches!(err, InitError::NotInitialized(_)));

    registry::reset_for_test();
}
