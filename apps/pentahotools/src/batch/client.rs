//! Directory capability consumed by the batch engine
//!
//! `PentahoClient` is the live implementation. `ValidationClient` wraps any
//! implementation for a dry run: reads pass through, writes do nothing.

use crate::api::{PentahoClient, RoleCategory};
use crate::error::CliResult;
use async_trait::async_trait;

/// Primitive user/role operations of a directory service
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn list_users(&self) -> CliResult<Vec<String>>;

    async fn list_all_roles(&self) -> CliResult<Vec<String>>;

    async fn list_roles_for_user(&self, user: &str) -> CliResult<Vec<String>>;

    async fn create_user(&self, user: &str, password: &str) -> CliResult<()>;

    async fn create_role(&self, role: &str) -> CliResult<()>;

    async fn update_password(&self, user: &str, password: &str) -> CliResult<()>;

    async fn assign_roles_to_user(&self, user: &str, roles: &[String]) -> CliResult<()>;

    async fn remove_roles_from_user(&self, user: &str, roles: &[String]) -> CliResult<()>;

    async fn delete_users(&self, users: &[String]) -> CliResult<()>;

    async fn delete_files(&self, paths: &[String]) -> CliResult<()>;
}

#[async_trait]
impl DirectoryClient for PentahoClient {
    async fn list_users(&self) -> CliResult<Vec<String>> {
        PentahoClient::list_users(self).await
    }

    async fn list_all_roles(&self) -> CliResult<Vec<String>> {
        self.list_roles(RoleCategory::All).await
    }

    async fn list_roles_for_user(&self, user: &str) -> CliResult<Vec<String>> {
        PentahoClient::list_roles_for_user(self, user).await
    }

    async fn create_user(&self, user: &str, password: &str) -> CliResult<()> {
        PentahoClient::create_user(self, user, password).await
    }

    async fn create_role(&self, role: &str) -> CliResult<()> {
        PentahoClient::create_role(self, role).await
    }

    async fn update_password(&self, user: &str, password: &str) -> CliResult<()> {
        PentahoClient::update_password(self, user, password).await
    }

    async fn assign_roles_to_user(&self, user: &str, roles: &[String]) -> CliResult<()> {
        PentahoClient::assign_roles_to_user(self, user, roles).await
    }

    async fn remove_roles_from_user(&self, user: &str, roles: &[String]) -> CliResult<()> {
        PentahoClient::remove_roles_from_user(self, user, roles).await
    }

    async fn delete_users(&self, users: &[String]) -> CliResult<()> {
        PentahoClient::delete_users(self, users).await
    }

    async fn delete_files(&self, paths: &[String]) -> CliResult<()> {
        PentahoClient::delete_files(self, paths).await
    }
}

/// Dry-run decorator: every mutating call succeeds without reaching the directory
pub struct ValidationClient<'a> {
    inner: &'a dyn DirectoryClient,
}

impl<'a> ValidationClient<'a> {
    pub fn new(inner: &'a dyn DirectoryClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<'a> DirectoryClient for ValidationClient<'a> {
    async fn list_users(&self) -> CliResult<Vec<String>> {
        self.inner.list_users().await
    }

    async fn list_all_roles(&self) -> CliResult<Vec<String>> {
        self.inner.list_all_roles().await
    }

    async fn list_roles_for_user(&self, user: &str) -> CliResult<Vec<String>> {
        self.inner.list_roles_for_user(user).await
    }

    async fn create_user(&self, _user: &str, _password: &str) -> CliResult<()> {
        Ok(())
    }

    async fn create_role(&self, _role: &str) -> CliResult<()> {
        Ok(())
    }

    async fn update_password(&self, _user: &str, _password: &str) -> CliResult<()> {
        Ok(())
    }

    async fn assign_roles_to_user(&self, _user: &str, _roles: &[String]) -> CliResult<()> {
        Ok(())
    }

    async fn remove_roles_from_user(&self, _user: &str, _roles: &[String]) -> CliResult<()> {
        Ok(())
    }

    async fn delete_users(&self, _users: &[String]) -> CliResult<()> {
        Ok(())
    }

    async fn delete_files(&self, _paths: &[String]) -> CliResult<()> {
        Ok(())
    }
}
