//! API client modules for the Pentaho server

mod client;
mod models;
mod permissions;
mod repository;
mod userrole;

pub use client::PentahoClient;
pub use models::{
    PasswordChange, RepositoryFileAcl, RoleAssignment, RoleList, UserCredentials, UserList,
};
pub use permissions::{Permission, PermissionChange};
pub use userrole::RoleCategory;
