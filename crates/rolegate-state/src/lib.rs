//! Rolegate-State: user persistence for rolegate
//!
//! Holds the `User` record that links a wallet to a Discord account and
//! remembers the outcome of the last verification.
//!
//! ## Layer 0 - Data/Persistence
//!
//! ## Key Components
//!
//! - `UserStore`: async lookup-by-wallet and save
//! - `SurrealUserStore`: SurrealDB-backed store (`mem://`, `surrealkv://`, `ws://`)
//! - `fakes::MemoryUserStore`: in-memory store for tests

mod error;
pub mod fakes;
mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_store;

pub use error::{StateError, StoreError};
pub use schema::UserRecord;
pub use storage_traits::{normalize_wallet, StoreResult, User, UserStore};
pub use surreal_store::{StoreConfig, SurrealUserStore};

/// Result type for rolegate-state connection operations
pub type Result<T> = std::result::Result<T, StateError>;
