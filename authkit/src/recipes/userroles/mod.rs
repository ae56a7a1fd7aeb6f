//! User-roles recipe.
//!
//! Role and permission management against the remote core, exposed
//! programmatically only — the host fronts these with its own
//! authenticated admin endpoints.

mod config;
mod recipe;
mod types;

pub use config::{UserRolesConfig, UserRolesOverrides, UserRolesSettings};
pub use recipe::{ApiInterface, RECIPE_ID, RecipeInterface, UserRolesRecipe, init};
pub use types::{
    AddRoleToUserInput, AddRoleToUserOutcome, CreateRoleInput, DeleteRoleInput,
    GetPermissionsForRoleInput, GetPermissionsOutcome, GetRolesForUserInput, RemoveUserRoleInput,
    RemoveUserRoleOutcome,
};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::recipe::RecipeModule;
    use crate::request::RequestContext;
    use crate::test_utils::MockRequestSender;

    use super::*;

    #[tokio::test]
    async fn test_recipe_owns_no_routes() {
        let recipe =
            UserRolesRecipe::new(Arc::new(MockRequestSender::new()), UserRolesConfig::default())
                .unwrap();
        assert!(recipe.routes().is_empty());
    }

    #[tokio::test]
    async fn test_add_role_uses_put_and_maps_unknown_role() {
        let sender = Arc::new(MockRequestSender::new().respond_with(
            "PUT",
            "/recipe/user/role",
            json!({"status": "UNKNOWN_ROLE_ERROR"}),
        ));
        let recipe = UserRolesRecipe::new(sender.clone(), UserRolesConfig::default()).unwrap();
        let add_role = recipe.recipe_impl().add_role_to_user.clone().unwrap();
        let outcome = add_role(AddRoleToUserInput {
            user_id: "user-1".to_string(),
            role: "ghost".to_string(),
            tenant_id: "public".to_string(),
            context: RequestContext::new(),
        })
        .await
        .unwrap();
        assert_eq!(outcome, AddRoleToUserOutcome::UnknownRole);
        assert_eq!(sender.calls_to("/recipe/user/role").len(), 1);
        assert_eq!(sender.calls()[0].method, "PUT");
    }

    #[tokio::test]
    async fn test_roles_for_user_parses_list() {
        let sender = MockRequestSender::new().respond_with(
            "GET",
            "/recipe/user/roles",
            json!({"status": "OK", "roles": ["admin", "editor"]}),
        );
        let recipe =
            UserRolesRecipe::new(Arc::new(sender), UserRolesConfig::default()).unwrap();
        let get_roles = recipe.recipe_impl().get_roles_for_user.clone().unwrap();
        let roles = get_roles(GetRolesForUserInput {
            user_id: "user-1".to_string(),
            tenant_id: "public".to_string(),
            context: RequestContext::new(),
        })
        .await
        .unwrap();
        assert_eq!(roles, vec!["admin".to_string(), "editor".to_string()]);
    }

    #[tokio::test]
    async fn test_create_role_reports_whether_new() {
        let sender = MockRequestSender::new().respond_with(
            "PUT",
            "/recipe/role",
            json!({"status": "OK", "createdNewRole": true}),
        );
        let recipe =
            UserRolesRecipe::new(Arc::new(sender), UserRolesConfig::default()).unwrap();
        let create = recipe
            .recipe_impl()
            .create_new_role_or_add_permissions
            .clone()
            .unwrap();
        let created = create(CreateRoleInput {
            role: "admin".to_string(),
            permissions: vec!["users:read".to_string()],
            tenant_id: "public".to_string(),
            context: RequestContext::new(),
        })
        .await
        .unwrap();
        assert!(created);
    }
}
