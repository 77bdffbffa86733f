//! In-memory directory recording every call, for engine tests

use super::client::DirectoryClient;
use super::error::DirectoryOperation;
use crate::error::{CliError, CliResult};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListUsers,
    ListAllRoles,
    ListRolesForUser(String),
    CreateUser(String, String),
    CreateRole(String),
    UpdatePassword(String, String),
    AssignRoles(String, Vec<String>),
    RemoveRoles(String, Vec<String>),
    DeleteUsers(Vec<String>),
    DeleteFiles(Vec<String>),
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Call::ListUsers | Call::ListAllRoles | Call::ListRolesForUser(_)
        )
    }
}

#[derive(Default)]
struct State {
    /// Users in listing order with their roles
    users: Vec<(String, Vec<String>)>,
    roles: Vec<String>,
    calls: Vec<Call>,
    /// Operations that fail, optionally only for one user or path
    failures: Vec<(DirectoryOperation, Option<String>)>,
}

#[derive(Default)]
pub struct FakeDirectory {
    state: Mutex<State>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user holding the given roles; unknown roles are added to the role list
    pub fn with_user(self, name: &str, roles: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for role in roles {
                if !state.roles.iter().any(|r| r == role) {
                    state.roles.push(role.to_string());
                }
            }
            state.users.push((
                name.to_string(),
                roles.iter().map(|r| r.to_string()).collect(),
            ));
        }
        self
    }

    pub fn with_roles(self, roles: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for role in roles {
                if !state.roles.iter().any(|r| r == role) {
                    state.roles.push(role.to_string());
                }
            }
        }
        self
    }

    /// Make an operation fail; `target` restricts it to one user or path
    pub fn failing(self, operation: DirectoryOperation, target: Option<&str>) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((operation, target.map(str::to_string)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn user_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.users.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn roles_of(&self, user: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|(name, _)| name == user)
            .map(|(_, roles)| roles.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: Call, operation: DirectoryOperation, target: &str) -> CliResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        let fails = state.failures.iter().any(|(op, t)| {
            *op == operation && t.as_deref().map_or(true, |t| t == target)
        });
        if fails {
            return Err(CliError::Api {
                status: 500,
                message: format!("injected {} failure", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn list_users(&self) -> CliResult<Vec<String>> {
        self.record(Call::ListUsers, DirectoryOperation::ListUsers, "")?;
        Ok(self.user_names())
    }

    async fn list_all_roles(&self) -> CliResult<Vec<String>> {
        self.record(Call::ListAllRoles, DirectoryOperation::ListAllRoles, "")?;
        Ok(self.state.lock().unwrap().roles.clone())
    }

    async fn list_roles_for_user(&self, user: &str) -> CliResult<Vec<String>> {
        self.record(
            Call::ListRolesForUser(user.to_string()),
            DirectoryOperation::ListRolesForUser,
            user,
        )?;
        Ok(self.roles_of(user))
    }

    async fn create_user(&self, user: &str, password: &str) -> CliResult<()> {
        self.record(
            Call::CreateUser(user.to_string(), password.to_string()),
            DirectoryOperation::CreateUser,
            user,
        )?;
        self.state
            .lock()
            .unwrap()
            .users
            .push((user.to_string(), Vec::new()));
        Ok(())
    }

    async fn create_role(&self, role: &str) -> CliResult<()> {
        self.record(
            Call::CreateRole(role.to_string()),
            DirectoryOperation::CreateRole,
            role,
        )?;
        self.state.lock().unwrap().roles.push(role.to_string());
        Ok(())
    }

    async fn update_password(&self, user: &str, password: &str) -> CliResult<()> {
        self.record(
            Call::UpdatePassword(user.to_string(), password.to_string()),
            DirectoryOperation::UpdatePassword,
            user,
        )
    }

    async fn assign_roles_to_user(&self, user: &str, roles: &[String]) -> CliResult<()> {
        self.record(
            Call::AssignRoles(user.to_string(), roles.to_vec()),
            DirectoryOperation::AssignRoles,
            user,
        )?;
        let mut state = self.state.lock().unwrap();
        if let Some((_, held)) = state.users.iter_mut().find(|(name, _)| name == user) {
            held.extend(roles.iter().cloned());
        }
        Ok(())
    }

    async fn remove_roles_from_user(&self, user: &str, roles: &[String]) -> CliResult<()> {
        self.record(
            Call::RemoveRoles(user.to_string(), roles.to_vec()),
            DirectoryOperation::RemoveRoles,
            user,
        )?;
        let mut state = self.state.lock().unwrap();
        if let Some((_, held)) = state.users.iter_mut().find(|(name, _)| name == user) {
            held.retain(|r| !roles.contains(r));
        }
        Ok(())
    }

    async fn delete_users(&self, users: &[String]) -> CliResult<()> {
        self.record(
            Call::DeleteUsers(users.to_vec()),
            DirectoryOperation::DeleteUsers,
            "",
        )?;
        self.state
            .lock()
            .unwrap()
            .users
            .retain(|(name, _)| !users.contains(name));
        Ok(())
    }

    async fn delete_files(&self, paths: &[String]) -> CliResult<()> {
        let target = paths.first().cloned().unwrap_or_default();
        self.record(
            Call::DeleteFiles(paths.to_vec()),
            DirectoryOperation::DeleteFiles,
            &target,
        )
    }
}
