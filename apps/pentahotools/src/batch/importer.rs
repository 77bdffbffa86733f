//! Row-by-row reconciliation of users and role memberships
//!
//! An `Importer` lives for one batch. Each call to [`Importer::import`]
//! converges one user onto its desired roles; afterwards
//! [`Importer::delete_remaining_users`] removes directory users that no row
//! mentioned.

use super::client::DirectoryClient;
use super::error::{DirectoryOperation, DirectoryResultExt, ImportError};
use super::resolver::IdentityResolver;
use crate::logging::Logger;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Role every user holds implicitly; never removed
pub const AUTHENTICATED_ROLE: &str = "Authenticated";
/// Account that is never swept and never loses [`ADMINISTRATOR_ROLE`]
pub const ADMIN_USER: &str = "admin";
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Behaviour switches of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    /// Reject names that only match an existing identity case-insensitively
    pub strict_case_sensitive: bool,
    /// Create roles that do not exist instead of failing the row
    pub create_roles: bool,
    /// Set the row password on every processed user
    pub update_password: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            strict_case_sensitive: true,
            create_roles: false,
            update_password: false,
        }
    }
}

/// Home directory of a user in the repository
pub fn home_directory(user: &str) -> String {
    format!("/home/{}", user)
}

pub struct Importer<'a> {
    client: &'a dyn DirectoryClient,
    logger: Arc<Logger>,
    resolver: IdentityResolver,
    /// Lower-cased name to name as written in the source, for every processed row
    appeared_users: HashMap<String, String>,
    update_password: bool,
}

impl<'a> Importer<'a> {
    pub fn new(
        client: &'a dyn DirectoryClient,
        logger: Arc<Logger>,
        settings: ImportSettings,
    ) -> Self {
        Self {
            client,
            logger,
            resolver: IdentityResolver::new(
                settings.strict_case_sensitive,
                settings.create_roles,
            ),
            appeared_users: HashMap::new(),
            update_password: settings.update_password,
        }
    }

    /// Whether a row for this user (in any casing) has been processed
    pub fn has_appeared(&self, user: &str) -> bool {
        self.appeared_users.contains_key(&user.to_lowercase())
    }

    /// Converge one user onto the given password and roles
    ///
    /// Blank role entries are ignored. A password update failure does not
    /// stop the role changes; it is returned once the row is otherwise done,
    /// ahead of any error the role changes produce.
    pub async fn import(
        &mut self,
        user: &str,
        password: &str,
        roles: &[String],
    ) -> Result<(), ImportError> {
        self.appeared_users
            .insert(user.to_lowercase(), user.to_string());

        let resolved = self
            .resolver
            .resolve_or_create_user(self.client, user, password)
            .await?;
        let user = resolved.name;
        if resolved.created {
            self.logger
                .verbose_with_context("import", "Created user", &[("user", user.as_str())]);
        }

        let mut deferred = None;
        if self.update_password {
            if let Err(e) = self
                .client
                .update_password(&user, password)
                .await
                .during(DirectoryOperation::UpdatePassword)
            {
                self.logger.error(
                    "Failed to update password",
                    &[("user", user.as_str()), ("error", e.to_string().as_str())],
                );
                deferred = Some(e);
            }
        }

        let outcome = self.converge_roles(&user, roles).await;
        match (deferred, outcome) {
            (Some(first), Err(later)) => {
                self.logger.error(
                    "Failed to update roles",
                    &[("user", user.as_str()), ("error", later.to_string().as_str())],
                );
                Err(first)
            }
            (Some(first), Ok(())) => Err(first),
            (None, outcome) => outcome,
        }
    }

    /// Assign and remove roles so the user holds exactly the given roles
    async fn converge_roles(&mut self, user: &str, roles: &[String]) -> Result<(), ImportError> {
        let current = self
            .client
            .list_roles_for_user(user)
            .await
            .during(DirectoryOperation::ListRolesForUser)?;
        let desired = self.desired_roles(roles).await?;

        let current_keys: HashSet<String> = current.iter().map(|r| r.to_lowercase()).collect();
        let desired_keys: HashSet<String> = desired.iter().map(|r| r.to_lowercase()).collect();

        let assign: Vec<String> = desired
            .iter()
            .filter(|r| !current_keys.contains(&r.to_lowercase()))
            .cloned()
            .collect();
        let remove: Vec<String> = current
            .iter()
            .filter(|r| !r.eq_ignore_ascii_case(AUTHENTICATED_ROLE))
            .filter(|r| !desired_keys.contains(&r.to_lowercase()))
            .cloned()
            .collect();

        if user.eq_ignore_ascii_case(ADMIN_USER) {
            if let Some(role) = remove
                .iter()
                .find(|r| r.eq_ignore_ascii_case(ADMINISTRATOR_ROLE))
            {
                return Err(ImportError::ProtectedIdentity {
                    user: user.to_string(),
                    role: role.clone(),
                });
            }
        }

        if !assign.is_empty() {
            self.client
                .assign_roles_to_user(user, &assign)
                .await
                .during(DirectoryOperation::AssignRoles)?;
            self.logger.verbose_with_context(
                "import",
                "Assigned roles",
                &[("user", user), ("roles", assign.join(":").as_str())],
            );
        }
        if !remove.is_empty() {
            self.client
                .remove_roles_from_user(user, &remove)
                .await
                .during(DirectoryOperation::RemoveRoles)?;
            self.logger.verbose_with_context(
                "import",
                "Removed roles",
                &[("user", user), ("roles", remove.join(":").as_str())],
            );
        }
        Ok(())
    }

    /// Resolve the non-blank roles of a row, dropping case-insensitive duplicates
    async fn desired_roles(&mut self, roles: &[String]) -> Result<Vec<String>, ImportError> {
        let mut seen = HashSet::new();
        let mut desired = Vec::new();

        for role in roles.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
            let resolved = self
                .resolver
                .resolve_or_create_role(self.client, role)
                .await?;
            if resolved.created {
                self.logger.verbose_with_context(
                    "import",
                    "Created role",
                    &[("role", resolved.name.as_str())],
                );
            }
            if seen.insert(resolved.name.to_lowercase()) {
                desired.push(resolved.name);
            }
        }
        Ok(desired)
    }

    /// Delete every directory user that no processed row mentioned
    ///
    /// The user listing is fetched again rather than taken from the cache.
    /// `admin` is never deleted. Users are removed with one bulk call; when
    /// `delete_home_directory` is set their home directories are then removed
    /// one by one, and failures there are counted instead of stopping the loop.
    /// Returns the deleted users.
    pub async fn delete_remaining_users(
        &mut self,
        delete_home_directory: bool,
    ) -> Result<Vec<String>, ImportError> {
        let all_users = self
            .client
            .list_users()
            .await
            .during(DirectoryOperation::ListUsers)?;

        let mut remaining = Vec::new();
        for user in all_users {
            if self.has_appeared(&user) {
                continue;
            }
            if user.eq_ignore_ascii_case(ADMIN_USER) {
                self.logger
                    .warn("The admin user can not be deleted", &[("user", user.as_str())]);
                continue;
            }
            remaining.push(user);
        }

        if remaining.is_empty() {
            return Ok(remaining);
        }

        self.client
            .delete_users(&remaining)
            .await
            .during(DirectoryOperation::DeleteUsers)?;
        self.logger.verbose_with_context(
            "import",
            "Deleted users",
            &[("users", remaining.join(",").as_str())],
        );

        if delete_home_directory {
            let mut failed = 0;
            for user in &remaining {
                let folder = home_directory(user);
                if let Err(e) = self.client.delete_files(&[folder.clone()]).await {
                    self.logger.error(
                        "Failed to delete the home directory",
                        &[
                            ("user", user.as_str()),
                            ("path", folder.as_str()),
                            ("error", e.to_string().as_str()),
                        ],
                    );
                    failed += 1;
                }
            }
            if failed > 0 {
                return Err(ImportError::HomeDirectoryCleanup {
                    failed,
                    total: remaining.len(),
                    deleted: remaining,
                });
            }
        }

        Ok(remaining)
    }
}
