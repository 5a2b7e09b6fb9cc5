//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryUserStore` that satisfies the `UserStore` contract without
//! any external dependencies.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::storage_traits::*;

/// In-memory user store backed by a `HashMap<wallet_key, User>`.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
    saves: Mutex<u64>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user without counting it as a save.
    pub fn with_user(self, user: User) -> Self {
        if let Some(wallet) = user.wallet() {
            self.users
                .lock()
                .unwrap()
                .insert(normalize_wallet(wallet), user.clone());
        }
        self
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> u64 {
        *self.saves.lock().unwrap()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_wallet(&self, address: &str) -> StoreResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&normalize_wallet(address)).cloned())
    }

    async fn save(&self, user: &User) -> StoreResult<()> {
        let wallet = user.wallet().ok_or(StoreError::MissingWallet)?;
        let mut users = self.users.lock().unwrap();
        users.insert(normalize_wallet(wallet), user.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
