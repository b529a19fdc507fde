//! Roles and permissions on the authorizer service.

use serde_json::{Map, Value, json};

use super::{ApiCall, Auth, ChatKit, path_id, to_body};
use crate::endpoint::Service;
use crate::error::{Error, Result};
use crate::transport::Backend;
use crate::types::{PermissionsUpdate, RoleScope};

/// Body naming a role and, for room-scoped roles, the room.
fn role_body(role_name: &str, room_id: Option<&str>) -> Result<Value> {
    path_id("role name", role_name)?;
    let mut body = Map::new();
    body.insert("name".into(), role_name.into());
    if let Some(room) = room_id {
        path_id("room id", room)?;
        body.insert("room_id".into(), room.into());
    }
    Ok(Value::Object(body))
}

impl<B: Backend> ChatKit<B> {
    /// Create a role with the given permissions.
    pub fn create_role(&self, name: &str, scope: RoleScope, permissions: &[&str]) -> B::Response {
        self.submit(|| {
            path_id("role name", name)?;
            let body = json!({ "scope": scope, "name": name, "permissions": permissions });
            Ok(ApiCall::post(Service::Authorizer, "/roles", Auth::Superuser).json(body))
        })
    }

    /// Delete a role.
    pub fn delete_role(&self, name: &str, scope: RoleScope) -> B::Response {
        self.submit(|| {
            let role = path_id("role name", name)?;
            Ok(ApiCall::delete(
                Service::Authorizer,
                format!("/roles/{role}/scope/{}", scope.as_str()),
                Auth::Superuser,
            ))
        })
    }

    /// Assign a role to a user. A `room_id` makes it a room-scoped assignment.
    pub fn assign_role_to_user(
        &self,
        user_id: &str,
        role_name: &str,
        room_id: Option<&str>,
    ) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            Ok(
                ApiCall::put(Service::Authorizer, format!("/users/{id}/roles"), Auth::Superuser)
                    .json(role_body(role_name, room_id)?),
            )
        })
    }

    /// Remove a role from a user. A `room_id` targets the room-scoped assignment.
    pub fn remove_role_from_user(
        &self,
        user_id: &str,
        role_name: &str,
        room_id: Option<&str>,
    ) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            Ok(
                ApiCall::delete(Service::Authorizer, format!("/users/{id}/roles"), Auth::Superuser)
                    .json(role_body(role_name, room_id)?),
            )
        })
    }

    /// List every role on the instance.
    pub fn list_all_roles(&self) -> B::Response {
        self.submit(|| Ok(ApiCall::get(Service::Authorizer, "/roles", Auth::Superuser)))
    }

    /// List the roles assigned to a user.
    pub fn list_user_roles(&self, user_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            Ok(ApiCall::get(Service::Authorizer, format!("/users/{id}/roles"), Auth::Superuser))
        })
    }

    /// List a role's permissions.
    pub fn list_role_permissions(&self, name: &str, scope: RoleScope) -> B::Response {
        self.submit(|| {
            let role = path_id("role name", name)?;
            Ok(ApiCall::get(
                Service::Authorizer,
                format!("/roles/{role}/scope/{}/permissions", scope.as_str()),
                Auth::Superuser,
            ))
        })
    }

    /// Grant and revoke permissions on a role.
    pub fn update_role_permissions(
        &self,
        name: &str,
        scope: RoleScope,
        update: &PermissionsUpdate,
    ) -> B::Response {
        self.submit(|| {
            let role = path_id("role name", name)?;
            if update.permissions_to_add.is_empty() && update.permissions_to_remove.is_empty() {
                return Err(Error::InvalidArgument(
                    "permissions to add or remove must not both be empty".into(),
                ));
            }
            Ok(ApiCall::put(
                Service::Authorizer,
                format!("/roles/{role}/scope/{}/permissions", scope.as_str()),
                Auth::Superuser,
            )
            .json(to_body(update)?))
        })
    }
}
