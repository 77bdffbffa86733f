//! Wire types for the user/role and repository endpoints

use serde::{Deserialize, Deserializer, Serialize};

/// Response of `api/userrolelist/users` and `getUsersInRole`
#[derive(Debug, Default, Deserialize)]
pub struct UserList {
    #[serde(default, alias = "user", deserialize_with = "one_or_many")]
    pub users: Vec<String>,
}

/// Response of the role listing endpoints and `getRolesForUser`
#[derive(Debug, Default, Deserialize)]
pub struct RoleList {
    #[serde(default, alias = "role", deserialize_with = "one_or_many")]
    pub roles: Vec<String>,
}

/// Body of `createUser` and `updatePassword`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials<'a> {
    pub user_name: &'a str,
    pub password: &'a str,
}

/// Body of `api/userroledao/user`, a password change checked against the old one
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange<'a> {
    pub user_name: &'a str,
    pub old_password: &'a str,
    pub new_password: &'a str,
}

/// Logical roles (permissions) granted to one role
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub role_name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub logical_roles: Vec<String>,
    #[serde(default, deserialize_with = "flag")]
    pub immutable: bool,
}

/// Response of `api/userroledao/logicalRoleMap`
#[derive(Debug, Default, Deserialize)]
pub struct SystemRolesMap {
    #[serde(default, deserialize_with = "one_or_many")]
    pub assignments: Vec<RoleAssignment>,
}

/// Body of `api/userroledao/roleAssignments`
#[derive(Debug, Serialize)]
pub struct RoleAssignmentUpdate<'a> {
    pub assignments: Vec<AssignmentUpdate<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdate<'a> {
    pub role_name: &'a str,
    pub logical_roles: &'a [String],
}

/// The part of a repository file ACL needed to address the file by id
#[derive(Debug, Deserialize)]
pub struct RepositoryFileAcl {
    #[serde(alias = "ID")]
    pub id: String,
}

/// The server renders a one-element list as a bare value
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
        OneOrMany::Null(()) => Vec::new(),
    })
}

/// Booleans may arrive as `true` or as `"true"`
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(text) => text.eq_ignore_ascii_case("true"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_list_array() {
        let list: UserList = serde_json::from_str(r#"{"users":["admin","suzy"]}"#).unwrap();
        assert_eq!(list.users, vec!["admin", "suzy"]);
    }

    #[test]
    fn test_user_list_single_string() {
        let list: UserList = serde_json::from_str(r#"{"users":"admin"}"#).unwrap();
        assert_eq!(list.users, vec!["admin"]);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let list: RoleList = serde_json::from_str("{}").unwrap();
        assert!(list.roles.is_empty());
        let list: UserList = serde_json::from_str(r#"{"users":null}"#).unwrap();
        assert!(list.users.is_empty());
    }

    #[test]
    fn test_roles_for_user_uses_singular_key() {
        let list: RoleList =
            serde_json::from_str(r#"{"role":["Authenticated","Power User"]}"#).unwrap();
        assert_eq!(list.roles, vec!["Authenticated", "Power User"]);
    }

    #[test]
    fn test_credentials_are_camel_case() {
        let body = serde_json::to_string(&UserCredentials {
            user_name: "bob",
            password: "pw",
        })
        .unwrap();
        assert_eq!(body, r#"{"userName":"bob","password":"pw"}"#);
    }

    #[test]
    fn test_acl_id() {
        let acl: RepositoryFileAcl =
            serde_json::from_str(r#"{"id":"4f1c","owner":"bob","aces":[]}"#).unwrap();
        assert_eq!(acl.id, "4f1c");
    }

    #[test]
    fn test_logical_role_map_shapes() {
        let map: SystemRolesMap = serde_json::from_str(
            r#"{"assignments":[
                {"roleName":"Administrator","immutable":"true","logicalRoles":["org.pentaho.security.administerSecurity","org.pentaho.repository.read"]},
                {"roleName":"Report Author","immutable":false,"logicalRoles":"org.pentaho.security.publish"},
                {"roleName":"Business Analyst"}
            ],"localizedRoleNames":[]}"#,
        )
        .unwrap();

        assert_eq!(map.assignments.len(), 3);
        assert!(map.assignments[0].immutable);
        assert_eq!(map.assignments[0].logical_roles.len(), 2);
        assert_eq!(
            map.assignments[1].logical_roles,
            vec!["org.pentaho.security.publish"]
        );
        assert!(!map.assignments[2].immutable);
        assert!(map.assignments[2].logical_roles.is_empty());
    }

    #[test]
    fn test_single_assignment_as_object() {
        let map: SystemRolesMap =
            serde_json::from_str(r#"{"assignments":{"roleName":"Power User"}}"#).unwrap();
        assert_eq!(map.assignments[0].role_name, "Power User");
    }

    #[test]
    fn test_password_change_body() {
        let body = serde_json::to_string(&PasswordChange {
            user_name: "bob",
            old_password: "old",
            new_password: "new",
        })
        .unwrap();
        assert_eq!(
            body,
            r#"{"userName":"bob","oldPassword":"old","newPassword":"new"}"#
        );
    }
}
