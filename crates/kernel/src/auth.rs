//! Admin users and the token directory used to authenticate them.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::permissions::Capability;

/// An authenticated admin-shell user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUser {
    pub name: String,
    pub capabilities: BTreeSet<Capability>,
    /// Administrators hold every capability.
    pub is_admin: bool,
}

impl AdminUser {
    /// Create a user holding the given capabilities.
    pub fn new(
        name: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            capabilities: capabilities.into_iter().collect(),
            is_admin: false,
        }
    }

    /// Create an administrator.
    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: BTreeSet::new(),
            is_admin: true,
        }
    }

    /// Check whether the user holds a capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.is_admin || self.capabilities.contains(&capability)
    }
}

/// One `[[users]]` record in the users file.
#[derive(Debug, Clone, Deserialize)]
struct UserRecord {
    name: String,
    token: String,
    #[serde(default)]
    capabilities: Vec<Capability>,
    #[serde(default)]
    is_admin: bool,
}

#[derive(Debug, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// Token → user lookup table.
#[derive(Debug, Default)]
pub struct UserDirectory {
    entries: Vec<(String, AdminUser)>,
}

impl UserDirectory {
    /// Create an empty directory (every token is rejected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user reachable with `token`.
    pub fn insert(&mut self, token: impl Into<String>, user: AdminUser) {
        self.entries.push((token.into(), user));
    }

    /// Parse a users file in TOML form.
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: UsersFile = toml::from_str(source).context("invalid users file")?;
        let mut directory = Self::new();
        for record in file.users {
            anyhow::ensure!(
                !record.token.is_empty(),
                "user '{}' has an empty token",
                record.name
            );
            let user = AdminUser {
                name: record.name,
                capabilities: record.capabilities.into_iter().collect(),
                is_admin: record.is_admin,
            };
            directory.insert(record.token, user);
        }
        Ok(directory)
    }

    /// Load the users file, or an empty directory if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "users file not found; no admin users configured");
            return Ok(Self::new());
        }
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read users file {}", path.display()))?;
        let directory = Self::from_toml(&source)?;
        info!(users = directory.len(), "loaded admin users");
        Ok(directory)
    }

    /// Find the user owning `token`.
    ///
    /// Every entry is compared in constant time so lookup latency does not
    /// reveal how much of a token matched.
    pub fn authenticate(&self, token: &str) -> Option<&AdminUser> {
        let mut found = None;
        for (candidate, user) in &self.entries {
            if bool::from(candidate.as_bytes().ct_eq(token.as_bytes())) && found.is_none() {
                found = Some(user);
            }
        }
        if found.is_none() {
            debug!("bearer token did not match any user");
        }
        found
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
