//! User and role API client methods
//!
//! `api/userrolelist/*` reads the directory, `api/userroledao/*` changes it.
//! Name lists in query parameters are tab separated.

use crate::api::client::{RequestBody, FORBIDDEN_MESSAGE};
use crate::api::models::{PasswordChange, RoleList, UserCredentials, UserList};
use crate::api::PentahoClient;
use crate::error::{CliError, CliResult};

const INVALID_FORMAT: &str = "Provided data has invalid format";
const USER_OR_ROLES_UNAVAILABLE: &str =
    "Internal server error prevented the system from properly retrieving either the user or roles";

/// Role listings offered by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCategory {
    /// Standard and system roles together
    All,
    Standard,
    System,
    Extra,
}

impl RoleCategory {
    fn path(self) -> &'static str {
        match self {
            Self::All => "api/userrolelist/allRoles",
            Self::Standard => "api/userrolelist/roles",
            Self::System => "api/userrolelist/systemRoles",
            Self::Extra => "api/userrolelist/extraRoles",
        }
    }
}

impl PentahoClient {
    /// List every user name
    pub async fn list_users(&self) -> CliResult<Vec<String>> {
        let response = self.get("api/userrolelist/users", &[]).await?;
        Ok(response.json::<UserList>()?.users)
    }

    /// List the users holding a role
    pub async fn list_users_in_role(&self, role: &str) -> CliResult<Vec<String>> {
        let response = self
            .get("api/userrolelist/getUsersInRole", &[("role", role)])
            .await?;
        Ok(response.json::<UserList>()?.users)
    }

    /// List roles of the given category
    pub async fn list_roles(&self, category: RoleCategory) -> CliResult<Vec<String>> {
        let response = self.get(category.path(), &[]).await?;
        Ok(response.json::<RoleList>()?.roles)
    }

    /// List the roles held by a user
    pub async fn list_roles_for_user(&self, user: &str) -> CliResult<Vec<String>> {
        let response = self
            .get("api/userrolelist/getRolesForUser", &[("user", user)])
            .await?;
        Ok(response.json::<RoleList>()?.roles)
    }

    pub async fn create_user(&self, user: &str, password: &str) -> CliResult<()> {
        self.logger()
            .verbose_with_context("userrole", "Creating user", &[("user", user)]);
        let body = RequestBody::json(&UserCredentials {
            user_name: user,
            password,
        })?;
        self.put(
            "api/userroledao/createUser",
            &[],
            body,
            &[
                (400, INVALID_FORMAT),
                (403, FORBIDDEN_MESSAGE),
                (412, "Unable to create user"),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn create_role(&self, role: &str) -> CliResult<()> {
        self.logger()
            .verbose_with_context("userrole", "Creating role", &[("role", role)]);
        self.put(
            "api/userroledao/createRole",
            &[("roleName", role)],
            RequestBody::Empty,
            &[
                (400, INVALID_FORMAT),
                (403, FORBIDDEN_MESSAGE),
                (412, "Unable to create role objects"),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn delete_roles(&self, roles: &[String]) -> CliResult<()> {
        if roles.is_empty() {
            return Err(CliError::Validation("Specify at least one role".to_string()));
        }
        let names = tab_list(roles);
        self.logger().verbose_with_context(
            "userrole",
            "Deleting roles",
            &[("roles", roles.join(",").as_str())],
        );
        self.put(
            "api/userroledao/deleteRoles",
            &[("roleNames", names.as_str())],
            RequestBody::Empty,
            &[
                (403, FORBIDDEN_MESSAGE),
                (500, "The system was unable to delete the roles passed in"),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn delete_users(&self, users: &[String]) -> CliResult<()> {
        if users.is_empty() {
            return Err(CliError::Validation("Specify at least one user".to_string()));
        }
        let names = tab_list(users);
        self.logger().verbose_with_context(
            "userrole",
            "Deleting users",
            &[("users", users.join(",").as_str())],
        );
        self.put(
            "api/userroledao/deleteUsers",
            &[("userNames", names.as_str())],
            RequestBody::Empty,
            &[(403, FORBIDDEN_MESSAGE), (500, USER_OR_ROLES_UNAVAILABLE)],
        )
        .await?;
        Ok(())
    }

    pub async fn update_password(&self, user: &str, password: &str) -> CliResult<()> {
        self.logger()
            .verbose_with_context("userrole", "Updating password", &[("user", user)]);
        let body = RequestBody::json(&UserCredentials {
            user_name: user,
            password,
        })?;
        self.put(
            "api/userroledao/updatePassword",
            &[],
            body,
            &[
                (400, INVALID_FORMAT),
                (403, "Provided user name or password is incorrect"),
                (412, "An error occurred in the platform"),
            ],
        )
        .await?;
        Ok(())
    }

    /// Change a password as the user would, proving the old one
    pub async fn change_user_password(
        &self,
        user: &str,
        old_password: &str,
        new_password: &str,
    ) -> CliResult<()> {
        self.logger()
            .verbose_with_context("userrole", "Changing password", &[("user", user)]);
        let body = RequestBody::json(&PasswordChange {
            user_name: user,
            old_password,
            new_password,
        })?;
        self.put(
            "api/userroledao/user",
            &[],
            body,
            &[
                (400, INVALID_FORMAT),
                (403, "Provided user name or password is incorrect"),
                (412, "An error occurred in the platform"),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn assign_roles_to_user(&self, user: &str, roles: &[String]) -> CliResult<()> {
        let names = roles.join("\t");
        self.logger().verbose_with_context(
            "userrole",
            "Assigning roles",
            &[("user", user), ("roles", roles.join(",").as_str())],
        );
        self.put(
            "api/userroledao/assignRoleToUser",
            &[("userName", user), ("roleNames", names.as_str())],
            RequestBody::Empty,
            &[(403, FORBIDDEN_MESSAGE), (500, USER_OR_ROLES_UNAVAILABLE)],
        )
        .await?;
        Ok(())
    }

    pub async fn remove_roles_from_user(&self, user: &str, roles: &[String]) -> CliResult<()> {
        let names = roles.join("\t");
        self.logger().verbose_with_context(
            "userrole",
            "Removing roles",
            &[("user", user), ("roles", roles.join(",").as_str())],
        );
        self.put(
            "api/userroledao/removeRoleFromUser",
            &[("userName", user), ("roleNames", names.as_str())],
            RequestBody::Empty,
            &[(403, FORBIDDEN_MESSAGE), (500, USER_OR_ROLES_UNAVAILABLE)],
        )
        .await?;
        Ok(())
    }
}

/// Tab-terminated list expected by the bulk delete endpoints
fn tab_list(names: &[String]) -> String {
    let mut list = names.join("\t");
    list.push('\t');
    list
}
