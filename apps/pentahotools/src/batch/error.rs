//! Errors raised while reconciling users and roles

use crate::error::CliError;
use std::fmt;
use thiserror::Error;

/// Which kind of directory identity a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    User,
    Role,
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKind::User => write!(f, "user"),
            IdentityKind::Role => write!(f, "role"),
        }
    }
}

/// Directory call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOperation {
    ListUsers,
    ListAllRoles,
    ListRolesForUser,
    CreateUser,
    CreateRole,
    UpdatePassword,
    AssignRoles,
    RemoveRoles,
    DeleteUsers,
    DeleteFiles,
}

impl fmt::Display for DirectoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DirectoryOperation::ListUsers => "list users",
            DirectoryOperation::ListAllRoles => "list all roles",
            DirectoryOperation::ListRolesForUser => "list roles for user",
            DirectoryOperation::CreateUser => "create user",
            DirectoryOperation::CreateRole => "create role",
            DirectoryOperation::UpdatePassword => "update password",
            DirectoryOperation::AssignRoles => "assign roles to user",
            DirectoryOperation::RemoveRoles => "remove roles from user",
            DirectoryOperation::DeleteUsers => "delete users",
            DirectoryOperation::DeleteFiles => "delete files",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    /// The name exists in the directory with different letter case
    #[error("Case of the {kind} name mismatched: got '{given}', expected '{expected}'")]
    CaseMismatch {
        kind: IdentityKind,
        given: String,
        expected: String,
    },

    #[error("No such role: {0}")]
    UnknownRole(String),

    #[error("Can not remove '{role}' role from '{user}'")]
    ProtectedIdentity { user: String, role: String },

    #[error("Failed to {operation}: {source}")]
    Directory {
        operation: DirectoryOperation,
        source: Box<CliError>,
    },

    /// The users were deleted but some home directories were left behind
    #[error("Failed to delete {failed} of {total} home directories")]
    HomeDirectoryCleanup {
        failed: usize,
        total: usize,
        /// Every user the sweep deleted
        deleted: Vec<String>,
    },
}

impl ImportError {
    pub fn directory(operation: DirectoryOperation, source: CliError) -> Self {
        ImportError::Directory {
            operation,
            source: Box::new(source),
        }
    }

    /// The underlying client error of a failed directory call
    pub fn directory_source(&self) -> Option<&CliError> {
        match self {
            ImportError::Directory { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// Whether the whole batch must stop rather than only the current row
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            ImportError::Directory {
                operation: DirectoryOperation::ListUsers
                    | DirectoryOperation::ListAllRoles
                    | DirectoryOperation::DeleteUsers,
                ..
            }
        )
    }
}

/// Attach the failing operation to a client result
pub(crate) trait DirectoryResultExt<T> {
    fn during(self, operation: DirectoryOperation) -> Result<T, ImportError>;
}

impl<T> DirectoryResultExt<T> for Result<T, CliError> {
    fn during(self, operation: DirectoryOperation) -> Result<T, ImportError> {
        self.map_err(|e| ImportError::directory(operation, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_failure(operation: DirectoryOperation) -> ImportError {
        ImportError::directory(operation, CliError::Network("reset".to_string()))
    }

    #[test]
    fn test_listing_and_bulk_delete_are_batch_fatal() {
        assert!(network_failure(DirectoryOperation::ListUsers).is_batch_fatal());
        assert!(network_failure(DirectoryOperation::ListAllRoles).is_batch_fatal());
        assert!(network_failure(DirectoryOperation::DeleteUsers).is_batch_fatal());
    }

    #[test]
    fn test_row_errors_are_not_batch_fatal() {
        assert!(!network_failure(DirectoryOperation::AssignRoles).is_batch_fatal());
        assert!(!network_failure(DirectoryOperation::DeleteFiles).is_batch_fatal());
        assert!(!ImportError::UnknownRole("Editor".to_string()).is_batch_fatal());
        assert!(!ImportError::ProtectedIdentity {
            user: "admin".to_string(),
            role: "Administrator".to_string(),
        }
        .is_batch_fatal());
    }

    #[test]
    fn test_display_case_mismatch() {
        let err = ImportError::CaseMismatch {
            kind: IdentityKind::Role,
            given: "rolea".to_string(),
            expected: "RoleA".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Case of the role name mismatched: got 'rolea', expected 'RoleA'"
        );
    }

    #[test]
    fn test_display_directory_failure() {
        let err = network_failure(DirectoryOperation::CreateUser);
        assert_eq!(err.to_string(), "Failed to create user: Network error: reset");
        assert!(err.directory_source().is_some());
    }
}
