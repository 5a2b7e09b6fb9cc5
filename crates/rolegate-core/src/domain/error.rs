//! Domain-level error taxonomy for rolegate.

use chain_reader::ChainError;
use discord_directory::DirectoryError;
use rolegate_state::StoreError;

/// A failed contract read (RPC error, timeout, revert, decode).
pub type ContractCallError = ChainError;

/// A failed role add/remove, or any other directory failure.
pub type DirectoryMutationError = DirectoryError;

/// Rolegate domain errors.
#[derive(Debug, thiserror::Error)]
pub enum RolegateError {
    #[error("role {role_name} ({role_id}) not found in directory")]
    RoleNotFound { role_name: String, role_id: String },

    #[error("contract call failed: {0}")]
    Contract(#[from] ContractCallError),

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryMutationError),

    #[error("user store error: {0}")]
    Store(#[from] StoreError),

    #[error("user has no linked Discord account")]
    MissingDiscordUser,

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for rolegate domain operations.
pub type Result<T> = std::result::Result<T, RolegateError>;
