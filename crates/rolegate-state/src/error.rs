//! Error types for rolegate-state

use thiserror::Error;

/// Errors raised while connecting to or preparing the database
#[derive(Error, Debug)]
pub enum StateError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),
}

/// Errors returned by `UserStore` operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A user cannot be saved without a wallet address to key it by
    #[error("user has no wallet address")]
    MissingWallet,

    /// The backend rejected or failed the query
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored row could not be decoded
    #[error("corrupt user record for wallet {wallet}: {reason}")]
    Corrupt { wallet: String, reason: String },
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<surrealdb::Error> for StateError {
    fn from(err: surrealdb::Error) -> Self {
        StateError::Connection(err.to_string())
    }
}
