//! Capability-table slot types and the trait every recipe implements

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppSettings;
use crate::core_client::RequestSender;
use crate::errors::{AuthError, ConfigError};
use crate::request::{ApiOutcome, ApiRequest, ApiResponse, RequestContext};

use super::routes::RouteDescriptor;

/// Boxed future used by capability-table slots
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// One slot of a programmatic capability table.
///
/// Slots are stored as `Option<Op<..>>`: `Some` holds the default
/// implementation or a user override, `None` means the operation was
/// explicitly disabled by an override. Wrapping a slot means capturing the
/// previous `Arc` in a new closure and storing the closure back.
pub type Op<I, O> = Arc<dyn Fn(I) -> BoxFuture<Result<O, AuthError>> + Send + Sync>;

/// Handler invoked when a matched HTTP slot turns out to be empty; the
/// default simply declines the request so the host application answers.
pub type Fallback = Arc<dyn Fn() -> BoxFuture<Result<ApiOutcome, AuthError>> + Send + Sync>;

/// The fallback used for ordinary dispatch: hand the request back to the
/// host application unchanged.
pub fn passthrough_fallback() -> Fallback {
    Arc::new(|| Box::pin(async { Ok(ApiOutcome::Passthrough) }))
}

/// Per-request options bundle handed to every HTTP capability-table slot.
///
/// `C` is the recipe's normalized settings type and `R` its programmatic
/// capability table; the table here is the post-override one, so an HTTP
/// default automatically picks up programmatic overrides.
pub struct ApiOptions<C, R> {
    pub settings: Arc<C>,
    pub recipe_impl: Arc<R>,
    pub request: ApiRequest,
    pub tenant_id: String,
    pub context: RequestContext,
    pub fallback: Fallback,
}

/// One slot of an HTTP capability table
pub type ApiHandler<C, R> =
    Arc<dyn Fn(ApiOptions<C, R>) -> BoxFuture<Result<ApiOutcome, AuthError>> + Send + Sync>;

/// A constructed recipe instance: normalized settings plus the two
/// post-override capability tables plus a route table.
///
/// Implementations are built exactly once per process (during `init`) and
/// are read-only afterwards, so concurrent dispatch needs no locking.
#[async_trait]
pub trait RecipeModule: Send + Sync {
    /// Identifier unique per process, e.g. `"emailpassword"`
    fn recipe_id(&self) -> &'static str;

    /// The routes this recipe owns. For composed recipes this is the union
    /// of direct routes and sub-recipe routes, tagged via
    /// [`RouteDescriptor::handled_by`].
    fn routes(&self) -> &[RouteDescriptor];

    /// Invoke the HTTP capability-table slot for `route_id`, or the
    /// fallback when the slot was cleared by an override. Composed recipes
    /// forward ids they do not own verbatim to the owning sub-recipe.
    async fn handle_request(
        &self,
        route_id: &str,
        request: ApiRequest,
        tenant_id: &str,
        context: RequestContext,
        fallback: Fallback,
    ) -> Result<ApiOutcome, AuthError>;

    /// Non-standard header names this recipe needs the host to allow in
    /// CORS preflight answers
    fn cors_allowed_headers(&self) -> Vec<String> {
        Vec::new()
    }

    /// Turn a domain error into this recipe's wire shape. `None` defers to
    /// the registry's default mapping.
    fn translate_error(&self, _err: &AuthError) -> Option<ApiResponse> {
        None
    }

    /// Downcast support for typed accessors on the process registry
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Everything a recipe constructor needs from the surrounding process
pub struct RecipeBuildContext {
    pub app: AppSettings,
    pub core: Arc<dyn RequestSender>,
}

/// A deferred recipe constructor, as passed to `init`'s recipe list. Each
/// recipe module exposes an `init(config)` returning one of these; the
/// registry runs them in order during start-up.
pub type RecipeInit =
    Box<dyn FnOnce(&RecipeBuildContext) -> Result<Arc<dyn RecipeModule>, ConfigError> + Send>;
