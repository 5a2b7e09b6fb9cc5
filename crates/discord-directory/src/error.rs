//! Error types for discord-directory

use thiserror::Error;

/// Which membership change failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Remove,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::Add => f.write_str("add"),
            MutationKind::Remove => f.write_str("remove"),
        }
    }
}

/// Errors returned by `RoleDirectory` operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectoryError {
    /// Adding or removing a role on a member failed
    #[error("failed to {kind} role {role_id} for user {user_id}: {reason}")]
    Mutation {
        kind: MutationKind,
        role_id: String,
        user_id: String,
        reason: String,
    },

    /// The API answered with a non-success status
    #[error("Discord API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never reached the API or the response was unreadable
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body did not have the expected shape
    #[error("unexpected Discord response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        DirectoryError::Http(err.to_string())
    }
}
