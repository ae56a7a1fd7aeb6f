//! Inputs and outcomes for the user-roles recipe

use crate::request::RequestContext;

pub struct AddRoleToUserInput {
    pub user_id: String,
    pub role: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRoleToUserOutcome {
    Ok { did_user_already_have_role: bool },
    UnknownRole,
}

pub struct RemoveUserRoleInput {
    pub user_id: String,
    pub role: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveUserRoleOutcome {
    Ok { did_user_have_role: bool },
    UnknownRole,
}

pub struct GetRolesForUserInput {
    pub user_id: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

pub struct CreateRoleInput {
    pub role: String,
    pub permissions: Vec<String>,
    pub tenant_id: String,
    pub context: RequestContext,
}

pub struct GetPermissionsForRoleInput {
    pub role: String,
    pub tenant_id: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetPermissionsOutcome {
    Ok { permissions: Vec<String> },
    UnknownRole,
}

pub struct DeleteRoleInput {
    pub role: String,
    pub tenant_id: String,
    pub context: RequestContext,
}
