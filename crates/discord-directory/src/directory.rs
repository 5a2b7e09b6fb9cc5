//! The `RoleDirectory` seam and the types it speaks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// Result type for directory operations
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// A guild role as resolved from the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// A guild member, identified by Discord user id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
}

impl DiscordUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl std::fmt::Display for DiscordUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Role lookup and membership mutation on an external directory.
///
/// Guarantees:
/// - `fetch_role` returns `Ok(None)` for an id the guild does not have.
/// - `add_role` / `remove_role` fail with `DirectoryError::Mutation`.
/// - `user_has_role` is `false` for users who are not guild members.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Resolve a role by id, bypassing any cache.
    async fn fetch_role(&self, role_id: &str) -> DirectoryResult<Option<Role>>;

    /// Number of members currently holding the role.
    async fn current_holder_count(&self, role_id: &str) -> DirectoryResult<u64>;

    /// Whether `user` currently holds `role`.
    async fn user_has_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<bool>;

    /// Grant `role` to `user`.
    async fn add_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<()>;

    /// Revoke `role` from `user`.
    async fn remove_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<()>;
}
