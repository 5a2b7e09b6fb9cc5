//! Storage trait definitions for rolegate
//!
//! `UserStore` is the only persistence seam the verification flow needs: look a
//! user up by the wallet that signed in, and write the user back once the
//! verification status is known.
//!
//! The trait is async and backend-agnostic. An in-memory fake is provided for
//! testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Canonical lookup key for a wallet address.
///
/// Wallets arrive both checksummed and lowercased depending on the signer, so
/// lookups compare the trimmed lowercase form.
pub fn normalize_wallet(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// A user linking a wallet to a Discord account.
///
/// The verification core only reads `wallet_address` and writes `status`;
/// the remaining fields are stamped by the sign-in flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Wallet that proved ownership by signing; `None` for incomplete records
    pub wallet_address: Option<String>,
    /// Discord user (snowflake) the wallet is linked to
    pub discord_user_id: Option<String>,
    /// When the last successful sign-in happened
    pub last_verified_at: Option<DateTime<Utc>>,
    /// Outcome of the last verification run (per-rule decisions)
    pub status: serde_json::Value,
}

impl User {
    /// A fresh user record for a wallet that has never signed in before.
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: Some(wallet_address.into()),
            ..Self::default()
        }
    }

    /// The wallet address, treating an empty or whitespace string as absent.
    pub fn wallet(&self) -> Option<&str> {
        self.wallet_address
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

/// User persistence.
///
/// Guarantees:
/// - `find_by_wallet` matches case-insensitively on the wallet address.
/// - `save` upserts: at most one user exists per wallet.
/// - `save` fails with `StoreError::MissingWallet` for users without a wallet.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user linked to `address`, if any.
    async fn find_by_wallet(&self, address: &str) -> StoreResult<Option<User>>;

    /// Insert or replace the user keyed by its wallet address.
    async fn save(&self, user: &User) -> StoreResult<()>;
}
