//! Case-insensitive resolution of user and role names
//!
//! The directory compares names case-insensitively but stores them with
//! their original casing. Both caches are filled from one full listing the
//! first time they are needed and then updated in place as names are created.

use super::client::DirectoryClient;
use super::error::{DirectoryOperation, DirectoryResultExt, IdentityKind, ImportError};
use std::collections::HashMap;

/// Lower-cased name to the directory's stored name
#[derive(Debug, Default, Clone)]
pub struct NameCache {
    names: HashMap<String, String>,
}

impl NameCache {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cache = Self::default();
        for name in names {
            cache.insert(name.into());
        }
        cache
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.names.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn insert(&mut self, name: String) {
        self.names.insert(name.to_lowercase(), name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A resolved name and whether resolving it created the identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub name: String,
    pub created: bool,
}

impl Resolved {
    fn existing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created: false,
        }
    }

    fn created(name: &str) -> Self {
        Self {
            name: name.to_string(),
            created: true,
        }
    }
}

pub struct IdentityResolver {
    users: Option<NameCache>,
    roles: Option<NameCache>,
    strict_case_sensitive: bool,
    create_roles: bool,
}

impl IdentityResolver {
    pub fn new(strict_case_sensitive: bool, create_roles: bool) -> Self {
        Self {
            users: None,
            roles: None,
            strict_case_sensitive,
            create_roles,
        }
    }

    /// Resolve a user to its stored name, creating the user when it is absent
    pub async fn resolve_or_create_user(
        &mut self,
        client: &dyn DirectoryClient,
        name: &str,
        password: &str,
    ) -> Result<Resolved, ImportError> {
        let strict = self.strict_case_sensitive;
        let users = self.users(client).await?;

        if let Some(existing) = users.get(name) {
            return check_case(IdentityKind::User, name, existing, strict);
        }

        client
            .create_user(name, password)
            .await
            .during(DirectoryOperation::CreateUser)?;
        users.insert(name.to_string());
        Ok(Resolved::created(name))
    }

    /// Resolve a role to its stored name, creating it only when role creation is enabled
    pub async fn resolve_or_create_role(
        &mut self,
        client: &dyn DirectoryClient,
        name: &str,
    ) -> Result<Resolved, ImportError> {
        let strict = self.strict_case_sensitive;
        let create_roles = self.create_roles;
        let roles = self.roles(client).await?;

        if let Some(existing) = roles.get(name) {
            return check_case(IdentityKind::Role, name, existing, strict);
        }
        if !create_roles {
            return Err(ImportError::UnknownRole(name.to_string()));
        }

        client
            .create_role(name)
            .await
            .during(DirectoryOperation::CreateRole)?;
        roles.insert(name.to_string());
        Ok(Resolved::created(name))
    }

    async fn users(&mut self, client: &dyn DirectoryClient) -> Result<&mut NameCache, ImportError> {
        if self.users.is_none() {
            let names = client
                .list_users()
                .await
                .during(DirectoryOperation::ListUsers)?;
            self.users = Some(NameCache::from_names(names));
        }
        Ok(self.users.get_or_insert_with(NameCache::default))
    }

    async fn roles(&mut self, client: &dyn DirectoryClient) -> Result<&mut NameCache, ImportError> {
        if self.roles.is_none() {
            let names = client
                .list_all_roles()
                .await
                .during(DirectoryOperation::ListAllRoles)?;
            self.roles = Some(NameCache::from_names(names));
        }
        Ok(self.roles.get_or_insert_with(NameCache::default))
    }
}

fn check_case(
    kind: IdentityKind,
    given: &str,
    existing: &str,
    strict: bool,
) -> Result<Resolved, ImportError> {
    if given != existing && strict {
        return Err(ImportError::CaseMismatch {
            kind,
            given: given.to_string(),
            expected: existing.to_string(),
        });
    }
    Ok(Resolved::existing(existing))
}
