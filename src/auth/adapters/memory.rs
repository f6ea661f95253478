//! In-memory user directory seeded from configuration.

use crate::auth::{
    domain::{AuthResult, UserId},
    ports::UserDirectory,
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredUser {
    id: UserId,
    salt: String,
    password_digest: String,
}

/// Read-only user directory holding salted password digests.
///
/// Users receive sequential identifiers starting at 1, in insertion order.
/// Plain-text passwords are discarded as soon as they are hashed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, StoredUser>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from `(username, password)` pairs.
    ///
    /// A repeated username replaces the earlier entry's password but keeps
    /// its identifier.
    #[must_use]
    pub fn from_credentials<I, U, P>(credentials: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: AsRef<str>,
    {
        let mut directory = Self::new();
        for (username, password) in credentials {
            directory.insert(username, password.as_ref());
        }
        directory
    }

    /// Adds or replaces a user and returns its identifier.
    pub fn insert(&mut self, username: impl Into<String>, password: &str) -> UserId {
        let name = username.into();
        let id = self
            .users
            .get(&name)
            .map_or_else(|| UserId::new(self.users.len() as u64 + 1), |user| user.id);
        let salt = Uuid::new_v4().simple().to_string();
        let password_digest = digest_password(&salt, password);
        self.users.insert(
            name,
            StoredUser {
                id,
                salt,
                password_digest,
            },
        );
        id
    }

    /// Returns the number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` when no user is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> AuthResult<Option<UserId>> {
        let matched = self
            .users
            .get(username)
            .filter(|user| digest_password(&user.salt, password) == user.password_digest)
            .map(|user| user.id);
        Ok(matched)
    }
}
