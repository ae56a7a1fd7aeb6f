//! authkit - recipe-based authentication SDK
//!
//! This crate lets a host application expose sign-up/sign-in/token/
//! role-management endpoints backed by a remote authentication core. Auth
//! features ship as independently-configurable *recipes*; each recipe
//! normalizes its configuration, builds default capability tables the
//! integrator can override slot by slot, and registers the HTTP routes it
//! owns. The process registry matches inbound requests to the owning
//! recipe and declines everything else back to the host.
//!
//! Framework integrations live in sibling crates (see `authkit-axum`).

mod config;
mod core_client;
mod errors;
mod recipe;
mod recipes;
mod registry;
mod request;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod dispatch_tests;

pub use config::{
    AppConfig, AppSettings, DEFAULT_API_BASE_PATH, DEFAULT_WEBSITE_BASE_PATH, NormalizedDomain,
    NormalizedPath,
};
pub use core_client::{CoreClient, CoreConfig, NetworkError, RequestSender};
pub use errors::{AuthError, ConfigError, InitError};
pub use recipe::{
    ApiHandler, ApiOptions, BoxFuture, Fallback, Op, OverrideFn, Overrides, RecipeBuildContext,
    RecipeInit, RecipeModule, RouteDescriptor, apply_override, find_route, passthrough_fallback,
};
pub use registry::{
    AuthConfig, ProcessRegistry, init, init_with_sender, instance, recipe_instance,
};
pub use request::{
    ApiOutcome, ApiRequest, ApiResponse, DEFAULT_TENANT_ID, RequestContext, ResponseBody,
    TENANT_ID_HEADER,
};

#[cfg(any(test, feature = "test-utils"))]
pub use registry::reset_for_test;

pub use recipes::{
    emailpassword, jwt, openid, session, thirdparty, thirdpartyemailpassword, userroles,
};
