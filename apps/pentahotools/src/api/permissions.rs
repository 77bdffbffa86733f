//! Role permissions (the server calls them logical roles)
//!
//! `api/userroledao/logicalRoleMap` lists the permissions of every role and
//! `api/userroledao/roleAssignments` replaces the permissions of one role.

use crate::api::client::{RequestBody, FORBIDDEN_MESSAGE};
use crate::api::models::{AssignmentUpdate, RoleAssignment, RoleAssignmentUpdate, SystemRolesMap};
use crate::api::PentahoClient;
use crate::error::{CliError, CliResult};
use std::fmt;
use std::str::FromStr;

/// Permissions that can be granted to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Execute,
    Datasource,
    ContentRead,
    ContentCreate,
    Schedule,
    Security,
    Publish,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::Execute,
        Permission::Datasource,
        Permission::ContentRead,
        Permission::ContentCreate,
        Permission::Schedule,
        Permission::Security,
        Permission::Publish,
    ];

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Execute => "execute",
            Self::Datasource => "datasource",
            Self::ContentRead => "content-read",
            Self::ContentCreate => "content-create",
            Self::Schedule => "schedule",
            Self::Security => "security",
            Self::Publish => "publish",
        }
    }

    /// Logical role name stored by the server
    pub fn logical_name(self) -> &'static str {
        match self {
            Self::Execute => "org.pentaho.repository.execute",
            Self::Datasource => "org.pentaho.platform.dataaccess.datasource.security.manage",
            Self::ContentRead => "org.pentaho.repository.read",
            Self::ContentCreate => "org.pentaho.repository.create",
            Self::Schedule => "org.pentaho.scheduler.manage",
            Self::Security => "org.pentaho.security.administerSecurity",
            Self::Publish => "org.pentaho.security.publish",
        }
    }

    pub fn from_logical_name(logical_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.logical_name() == logical_name)
    }

    fn available_names() -> String {
        Self::ALL.map(Permission::name).join(", ")
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name(), self.logical_name())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown permission '{s}', expected one of: {}",
                    Self::available_names()
                )
            })
    }
}

/// Add to or remove from the current permissions of a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionChange {
    Add,
    Remove,
}

impl PentahoClient {
    /// List the permissions of every role
    pub async fn list_role_permissions(&self) -> CliResult<Vec<RoleAssignment>> {
        let response = self
            .get("api/userroledao/logicalRoleMap", &[("locale", "en")])
            .await?;
        Ok(response.json::<SystemRolesMap>()?.assignments)
    }

    /// Permissions of one role, matched regardless of case
    pub async fn role_permissions(&self, role: &str) -> CliResult<RoleAssignment> {
        self.list_role_permissions()
            .await?
            .into_iter()
            .find(|a| a.role_name.eq_ignore_ascii_case(role))
            .ok_or_else(|| CliError::NotFound(format!("No such role: {role}")))
    }

    /// Replace the logical roles granted to a role
    pub async fn assign_logical_roles(&self, role: &str, logical_roles: &[String]) -> CliResult<()> {
        self.logger().verbose_with_context(
            "userrole",
            "Setting permissions",
            &[("role", role), ("permissions", logical_roles.join(",").as_str())],
        );
        let body = RequestBody::json(&RoleAssignmentUpdate {
            assignments: vec![AssignmentUpdate {
                role_name: role,
                logical_roles,
            }],
        })?;
        self.put(
            "api/userroledao/roleAssignments",
            &[],
            body,
            &[(403, FORBIDDEN_MESSAGE)],
        )
        .await?;
        Ok(())
    }

    /// Grant exactly the given permissions to a role
    pub async fn set_permissions(&self, role: &str, permissions: &[Permission]) -> CliResult<()> {
        let logical_roles: Vec<String> = permissions
            .iter()
            .map(|p| p.logical_name().to_string())
            .collect();
        self.assign_logical_roles(role, &logical_roles).await
    }

    /// Add or remove permissions, keeping the others the role already has
    ///
    /// Fails without writing when the role is immutable, when an added
    /// permission is already granted or when a removed one is not.
    pub async fn change_permissions(
        &self,
        role: &str,
        change: PermissionChange,
        permissions: &[Permission],
    ) -> CliResult<()> {
        let current = self.role_permissions(role).await?;
        let logical_roles = apply_change(&current, change, permissions)?;
        self.assign_logical_roles(&current.role_name, &logical_roles)
            .await
    }
}

fn apply_change(
    current: &RoleAssignment,
    change: PermissionChange,
    permissions: &[Permission],
) -> CliResult<Vec<String>> {
    if current.immutable {
        return Err(CliError::Validation(format!(
            "The role '{}' is immutable",
            current.role_name
        )));
    }

    let mut logical_roles = current.logical_roles.clone();
    for permission in permissions {
        let position = logical_roles
            .iter()
            .position(|l| l == permission.logical_name());
        match (change, position) {
            (PermissionChange::Add, None) => {
                logical_roles.push(permission.logical_name().to_string())
            }
            (PermissionChange::Add, Some(_)) => {
                return Err(CliError::Validation(format!(
                    "'{}' already has the permission '{}'",
                    current.role_name,
                    permission.name()
                )))
            }
            (PermissionChange::Remove, Some(index)) => {
                logical_roles.remove(index);
            }
            (PermissionChange::Remove, None) => {
                return Err(CliError::Validation(format!(
                    "'{}' does not have the permission '{}'",
                    current.role_name,
                    permission.name()
                )))
            }
        }
    }
    Ok(logical_roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(immutable: bool, logical_roles: &[&str]) -> RoleAssignment {
        RoleAssignment {
            role_name: "Report Author".to_string(),
            logical_roles: logical_roles.iter().map(|l| l.to_string()).collect(),
            immutable,
        }
    }

    #[test]
    fn test_permission_names() {
        assert_eq!(
            "content-read".parse::<Permission>().unwrap(),
            Permission::ContentRead
        );
        assert_eq!(
            Permission::from_logical_name("org.pentaho.security.publish"),
            Some(Permission::Publish)
        );
        assert_eq!(
            Permission::Schedule.to_string(),
            "schedule <org.pentaho.scheduler.manage>"
        );

        let err = "admin".parse::<Permission>().unwrap_err();
        assert!(err.contains("execute, datasource"));
    }

    #[test]
    fn test_add_keeps_unknown_logical_roles() {
        let current = assignment(false, &["com.example.custom", "org.pentaho.repository.read"]);
        let updated =
            apply_change(&current, PermissionChange::Add, &[Permission::Publish]).unwrap();
        assert_eq!(
            updated,
            vec![
                "com.example.custom",
                "org.pentaho.repository.read",
                "org.pentaho.security.publish"
            ]
        );
    }

    #[test]
    fn test_add_existing_permission_fails() {
        let current = assignment(false, &["org.pentaho.repository.read"]);
        let err =
            apply_change(&current, PermissionChange::Add, &[Permission::ContentRead]).unwrap_err();
        assert!(err.to_string().contains("already has"));
    }

    #[test]
    fn test_remove_permission() {
        let current = assignment(
            false,
            &["org.pentaho.repository.read", "org.pentaho.repository.create"],
        );
        let updated =
            apply_change(&current, PermissionChange::Remove, &[Permission::ContentRead]).unwrap();
        assert_eq!(updated, vec!["org.pentaho.repository.create"]);

        let err = apply_change(&current, PermissionChange::Remove, &[Permission::Security])
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_immutable_role_is_not_changed() {
        let current = assignment(true, &[]);
        let err =
            apply_change(&current, PermissionChange::Add, &[Permission::Execute]).unwrap_err();
        assert!(err.to_string().contains("immutable"));
    }
}
