//! The user-roles recipe: role and permission management.
//!
//! This recipe owns no HTTP routes; role management is a back-office
//! concern the host application fronts with its own (authenticated)
//! endpoints. It is the degenerate instance of the recipe pattern: the
//! HTTP capability table is empty, the route table likewise, but the
//! override machinery works the same as everywhere else.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::core_client::RequestSender;
use crate::errors::{AuthError, ConfigError, InitError};
use crate::recipe::{
    Fallback, Op, RecipeBuildContext, RecipeInit, RecipeModule, RouteDescriptor, apply_override,
};
use crate::request::{ApiOutcome, ApiRequest, RequestContext};

use super::config::{UserRolesConfig, UserRolesSettings, normalize};
use super::types::{
    AddRoleToUserInput, AddRoleToUserOutcome, CreateRoleInput, DeleteRoleInput,
    GetPermissionsForRoleInput, GetPermissionsOutcome, GetRolesForUserInput, RemoveUserRoleInput,
    RemoveUserRoleOutcome,
};

pub const RECIPE_ID: &str = "userroles";

pub struct RecipeInterface {
    pub add_role_to_user: Option<Op<AddRoleToUserInput, AddRoleToUserOutcome>>,
    pub remove_user_role: Option<Op<RemoveUserRoleInput, RemoveUserRoleOutcome>>,
    pub get_roles_for_user: Option<Op<GetRolesForUserInput, Vec<String>>>,
    pub create_new_role_or_add_permissions: Option<Op<CreateRoleInput, bool>>,
    pub get_permissions_for_role: Option<Op<GetPermissionsForRoleInput, GetPermissionsOutcome>>,
    pub delete_role: Option<Op<DeleteRoleInput, bool>>,
}

/// This recipe exposes no HTTP operations; the empty table exists so the
/// override hook machinery stays uniform across recipes
pub struct ApiInterface {}

fn string_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn default_recipe_interface(core: Arc<dyn RequestSender>) -> RecipeInterface {
    let add_role_to_user: Op<AddRoleToUserInput, AddRoleToUserOutcome> = {
        let core = core.clone();
        Arc::new(move |input: AddRoleToUserInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_put(
                        "/recipe/user/role",
                        json!({"userId": input.user_id, "role": input.role}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => Ok(AddRoleToUserOutcome::Ok {
                        did_user_already_have_role: response["didUserAlreadyHaveRole"]
                            .as_bool()
                            .unwrap_or(false),
                    }),
                    Some("UNKNOWN_ROLE_ERROR") => Ok(AddRoleToUserOutcome::UnknownRole),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "add role answered {response}"
                    ))),
                }
            })
        })
    };

    let remove_user_role: Op<RemoveUserRoleInput, RemoveUserRoleOutcome> = {
        let core = core.clone();
        Arc::new(move |input: RemoveUserRoleInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/user/role/remove",
                        json!({"userId": input.user_id, "role": input.role}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => Ok(RemoveUserRoleOutcome::Ok {
                        did_user_have_role: response["didUserHaveRole"].as_bool().unwrap_or(false),
                    }),
                    Some("UNKNOWN_ROLE_ERROR") => Ok(RemoveUserRoleOutcome::UnknownRole),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "remove role answered {response}"
                    ))),
                }
            })
        })
    };

    let get_roles_for_user: Op<GetRolesForUserInput, Vec<String>> = {
        let core = core.clone();
        Arc::new(move |input: GetRolesForUserInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_get(
                        "/recipe/user/roles",
                        &[("userId", input.user_id)],
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                Ok(string_list(&response["roles"]))
            })
        })
    };

    let create_new_role_or_add_permissions: Op<CreateRoleInput, bool> = {
        let core = core.clone();
        Arc::new(move |input: CreateRoleInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_put(
                        "/recipe/role",
                        json!({"role": input.role, "permissions": input.permissions}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                Ok(response["createdNewRole"].as_bool().unwrap_or(false))
            })
        })
    };

    let get_permissions_for_role: Op<GetPermissionsForRoleInput, GetPermissionsOutcome> = {
        let core = core.clone();
        Arc::new(move |input: GetPermissionsForRoleInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_get(
                        "/recipe/role/permissions",
                        &[("role", input.role)],
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                match response["status"].as_str() {
                    Some("OK") => Ok(GetPermissionsOutcome::Ok {
                        permissions: string_list(&response["permissions"]),
                    }),
                    Some("UNKNOWN_ROLE_ERROR") => Ok(GetPermissionsOutcome::UnknownRole),
                    _ => Err(AuthError::UnexpectedCoreResponse(format!(
                        "get permissions answered {response}"
                    ))),
                }
            })
        })
    };

    let delete_role: Op<DeleteRoleInput, bool> = {
        let core = core.clone();
        Arc::new(move |input: DeleteRoleInput| {
            let core = core.clone();
            Box::pin(async move {
                let response = core
                    .send_post(
                        "/recipe/role/remove",
                        json!({"role": input.role}),
                        &input.tenant_id,
                        &input.context,
                    )
                    .await?;
                Ok(response["didRoleExist"].as_bool().unwrap_or(false))
            })
        })
    };

    RecipeInterface {
        add_role_to_user: Some(add_role_to_user),
        remove_user_role: Some(remove_user_role),
        get_roles_for_user: Some(get_roles_for_user),
        create_new_role_or_add_permissions: Some(create_new_role_or_add_permissions),
        get_permissions_for_role: Some(get_permissions_for_role),
        delete_role: Some(delete_role),
    }
}

pub struct UserRolesRecipe {
    settings: Arc<UserRolesSettings>,
    recipe_impl: Arc<RecipeInterface>,
    routes: Vec<RouteDescriptor>,
}

impl UserRolesRecipe {
    pub fn new(core: Arc<dyn RequestSender>, config: UserRolesConfig) -> Result<Self, ConfigError> {
        let settings = Arc::new(normalize(&config)?);
        let recipe_impl = Arc::new(apply_override(
            default_recipe_interface(core),
            config.overrides.functions,
        ));
        // The HTTP table is empty either way; the hook still runs so that
        // table-level instrumentation composes uniformly
        let _api_impl = apply_override(ApiInterface {}, config.overrides.apis);
        Ok(Self {
            settings,
            recipe_impl,
            routes: Vec::new(),
        })
    }

    pub fn recipe_impl(&self) -> Arc<RecipeInterface> {
        self.recipe_impl.clone()
    }

    pub fn settings(&self) -> &UserRolesSettings {
        &self.settings
    }

    pub fn instance() -> Result<Arc<Self>, InitError> {
        crate::registry::recipe_instance::<Self>(RECIPE_ID)
    }
}

#[async_trait]
impl RecipeModule for UserRolesRecipe {
    fn recipe_id(&self) -> &'static str {
        RECIPE_ID
    }

    fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    async fn handle_request(
        &self,
        _route_id: &str,
        _request: ApiRequest,
        _tenant_id: &str,
        _context: RequestContext,
        fallback: Fallback,
    ) -> Result<ApiOutcome, AuthError> {
        fallback().await
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

pub fn init(config: UserRolesConfig) -> RecipeInit {
    Box::new(move |context: &RecipeBuildContext| {
        let recipe = UserRolesRecipe::new(context.core.clone(), config)?;
        Ok(Arc::new(recipe) as Arc<dyn RecipeModule>)
    })
}
