//! The process registry: the ordered list of constructed recipes, the
//! top-level request dispatcher, and the once-per-process lifecycle.
//!
//! The registry itself is an ordinary value: build one with
//! [`ProcessRegistry::build`] (or [`ProcessRegistry::build_with_sender`] in
//! tests) and thread it into the HTTP layer by reference. [`init`] stores
//! one in the process-wide singleton for the accessor-style API; the
//! singleton slot is written exactly once and only cleared by the
//! test-only [`reset_for_test`].

use std::sync::{Arc, PoisonError, RwLock};

use http::StatusCode;
use serde_json::json;

use crate::config::{AppConfig, AppSettings};
use crate::core_client::{CoreClient, CoreConfig, RequestSender};
use crate::errors::{AuthError, InitError};
use crate::recipe::{
    RecipeBuildContext, RecipeInit, RecipeModule, find_route, passthrough_fallback,
};
use crate::request::{ApiOutcome, ApiRequest, ApiResponse, RequestContext, TENANT_ID_HEADER};

/// Everything `init` needs: app settings, core connection, and the ordered
/// recipe list
pub struct AuthConfig {
    pub app: AppConfig,
    pub core: CoreConfig,
    pub recipes: Vec<RecipeInit>,
}

pub struct ProcessRegistry {
    app: AppSettings,
    recipes: Vec<Arc<dyn RecipeModule>>,
}

impl std::fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("recipes", &self.recipes.len())
            .finish()
    }
}

impl ProcessRegistry {
    /// Construct a registry against the production core client
    pub fn build(config: AuthConfig) -> Result<Self, InitError> {
        let sender: Arc<dyn RequestSender> = Arc::new(CoreClient::new(&config.core)?);
        Self::build_with_sender(config.app, config.recipes, sender)
    }

    /// Construct a registry with a caller-supplied request sender.
    /// Constructors run in registration order; the first configuration
    /// error aborts the build.
    pub fn build_with_sender(
        app: AppConfig,
        recipes: Vec<RecipeInit>,
        core: Arc<dyn RequestSender>,
    ) -> Result<Self, InitError> {
        let app = AppSettings::normalize(&app)?;
        if recipes.is_empty() {
            return Err(InitError::NoRecipesProvided);
        }
        let context = RecipeBuildContext {
            app: app.clone(),
            core,
        };
        let mut built: Vec<Arc<dyn RecipeModule>> = Vec::with_capacity(recipes.len());
        for constructor in recipes {
            let recipe = constructor(&context)?;
            tracing::info!(recipe = recipe.recipe_id(), "recipe initialized");
            built.push(recipe);
        }
        Ok(Self {
            app,
            recipes: built,
        })
    }

    pub fn app(&self) -> &AppSettings {
        &self.app
    }

    pub fn recipes(&self) -> &[Arc<dyn RecipeModule>] {
        &self.recipes
    }

    pub fn recipe_by_id(&self, recipe_id: &str) -> Option<&Arc<dyn RecipeModule>> {
        self.recipes
            .iter()
            .find(|recipe| recipe.recipe_id() == recipe_id)
    }

    /// Union of the base headers every integration needs and each recipe's
    /// own contribution, first-seen order
    pub fn cors_allowed_headers(&self) -> Vec<String> {
        let mut headers = vec![TENANT_ID_HEADER.to_string()];
        for recipe in &self.recipes {
            for header in recipe.cors_allowed_headers() {
                if !headers.contains(&header) {
                    headers.push(header);
                }
            }
        }
        headers
    }

    /// Dispatch one inbound request.
    ///
    /// Recipes are tried in registration order; the first enabled route
    /// descriptor matching the exact (method, relative path) wins. No
    /// match, or a match whose slot declines, yields
    /// [`ApiOutcome::Passthrough`]. Per-request errors are translated into
    /// a response here (recipe hook first, default mapping otherwise) so
    /// one failing request never becomes a transport fault.
    pub async fn handle(&self, request: ApiRequest) -> ApiOutcome {
        let Some(relative) = self.app.api_base_path.strip_from(&request.path) else {
            return ApiOutcome::Passthrough;
        };
        for recipe in &self.recipes {
            let Some(route) = find_route(recipe.routes(), &request.method, &relative) else {
                continue;
            };
            let tenant_id = request.tenant_id().to_string();
            let context = RequestContext::new();
            tracing::debug!(
                recipe = recipe.recipe_id(),
                route = route.id,
                tenant = %tenant_id,
                request_id = context.request_id(),
                "dispatching"
            );
            let result = recipe
                .handle_request(route.id, request, &tenant_id, context, passthrough_fallback())
                .await;
            return match result {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(
                        recipe = recipe.recipe_id(),
                        route = route.id,
                        error = %err,
                        "request failed"
                    );
                    let response = recipe
                        .translate_error(&err)
                        .unwrap_or_else(|| default_error_response(&err));
                    ApiOutcome::Response(response)
                }
            };
        }
        ApiOutcome::Passthrough
    }
}

/// Default mapping applied when the owning recipe's translation hook
/// declines
fn default_error_response(err: &AuthError) -> ApiResponse {
    let status = match err {
        AuthError::BadInput(_) => StatusCode::BAD_REQUEST,
        AuthError::Unauthorized(_) | AuthError::TryRefreshToken => StatusCode::UNAUTHORIZED,
        AuthError::Network(_) | AuthError::UnexpectedCoreResponse(_) | AuthError::General(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    ApiResponse::json(status, json!({"message": err.to_string()}))
}

static REGISTRY: RwLock<Option<Arc<ProcessRegistry>>> = RwLock::new(None);

/// Initialize the process-wide registry. Runs every recipe constructor in
/// order; fails with [`InitError::AlreadyInitialized`] when called twice
/// without an intervening [`reset_for_test`].
pub fn init(config: AuthConfig) -> Result<(), InitError> {
    let mut slot = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(InitError::AlreadyInitialized);
    }
    let registry = ProcessRegistry::build(config)?;
    tracing::info!(
        app = %registry.app.app_name,
        recipes = registry.recipes.len(),
        "authkit initialized"
    );
    *slot = Some(Arc::new(registry));
    Ok(())
}

/// [`init`] with a caller-supplied request sender
pub fn init_with_sender(
    app: AppConfig,
    recipes: Vec<RecipeInit>,
    core: Arc<dyn RequestSender>,
) -> Result<(), InitError> {
    let mut slot = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(InitError::AlreadyInitialized);
    }
    let registry = ProcessRegistry::build_with_sender(app, recipes, core)?;
    *slot = Some(Arc::new(registry));
    Ok(())
}

/// The registry stored by [`init`]
pub fn instance() -> Result<Arc<ProcessRegistry>, InitError> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(|| InitError::NotInitialized("the process registry".to_string()))
}

/// Typed accessor for a recipe singleton, used by each recipe's
/// `instance()`; fails with [`InitError::NotInitialized`] naming the
/// recipe when `init` has not run or the recipe was not registered
pub fn recipe_instance<T: Send + Sync + 'static>(recipe_id: &str) -> Result<Arc<T>, InitError> {
    let not_initialized = || InitError::NotInitialized(format!("the {recipe_id} recipe"));
    let registry = instance().map_err(|_| not_initialized())?;
    let module = registry
        .recipe_by_id(recipe_id)
        .cloned()
        .ok_or_else(not_initialized)?;
    module.as_any().downcast::<T>().map_err(|_| not_initialized())
}

/// Clear the singleton so tests can re-run `init`. Never call this with
/// live traffic in flight.
#[cfg(any(test, feature = "test-utils"))]
pub fn reset_for_test() {
    let mut slot = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}
