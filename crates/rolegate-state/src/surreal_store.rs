//! SurrealDB-backed UserStore implementation
//!
//! Uses `schema::UserRecord` for persistence, converting to/from
//! `storage_traits::User` at the boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tracing::{debug, info, instrument};

use crate::error::{StateError, StoreError};
use crate::migrations;
use crate::schema::UserRecord;
use crate::storage_traits::{normalize_wallet, StoreResult, User, UserStore};

/// Connection settings for the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Engine URL: `mem://`, `surrealkv://path`, `ws://host:port`
    #[serde(default = "default_url")]
    pub url: String,
    /// Namespace (default: "rolegate")
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Database name (default: "main")
    #[serde(default = "default_database")]
    pub database: String,
    /// Root username for remote engines
    #[serde(default)]
    pub username: Option<String>,
    /// Root password for remote engines
    #[serde(default)]
    pub password: Option<String>,
}

fn default_url() -> String {
    "mem://".to_string()
}

fn default_namespace() -> String {
    "rolegate".to_string()
}

fn default_database() -> String {
    "main".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            namespace: default_namespace(),
            database: default_database(),
            username: None,
            password: None,
        }
    }
}

impl StoreConfig {
    /// Create a config for the given engine URL with default namespace/database
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set root credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Apply environment overrides
    ///
    /// Reads:
    /// - ROLEGATE_STORE_URL
    /// - SURREALDB_USERNAME / SURREALDB_PASSWORD
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("ROLEGATE_STORE_URL") {
            self.url = url;
        }
        if let (Ok(user), Ok(pass)) = (
            std::env::var("SURREALDB_USERNAME"),
            std::env::var("SURREALDB_PASSWORD"),
        ) {
            self.username = Some(user);
            self.password = Some(pass);
        }
        self
    }
}

/// SurrealDB-backed implementation of [`UserStore`].
#[derive(Clone)]
pub struct SurrealUserStore {
    db: Surreal<Any>,
}

impl SurrealUserStore {
    /// Create an in-memory instance for testing.
    pub async fn in_memory() -> crate::Result<Self> {
        Self::connect(&StoreConfig::default()).await
    }

    /// Connect using `config`, sign in if credentials are present, and run
    /// schema initialization.
    #[instrument(skip(config), fields(url = %config.url, namespace = %config.namespace, database = %config.database))]
    pub async fn connect(config: &StoreConfig) -> crate::Result<Self> {
        if let Some(path) = config.url.strip_prefix("surrealkv://") {
            tokio::fs::create_dir_all(path).await.map_err(|e| {
                StateError::Connection(format!(
                    "Failed to create database directory {}: {}",
                    path, e
                ))
            })?;
        }

        let db = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .map_err(|e| {
                StateError::Connection(format!("Failed to connect to {}: {}", config.url, e))
            })?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await
            .map_err(|e| StateError::Connection(format!("Root auth failed: {e}")))?;
        }

        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(|e| StateError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;

        info!("SurrealUserStore connected");
        Ok(Self { db })
    }

    async fn fetch(&self, key: String) -> StoreResult<Option<UserRecord>> {
        let mut res = self
            .db
            .query("SELECT * FROM users WHERE wallet_key = $key")
            .bind(("key", key.clone()))
            .await?
            .check()?;

        // statement errors were surfaced by `check`; what remains is row decoding
        let rows: Vec<UserRecord> = res.take(0).map_err(|e| StoreError::Corrupt {
            wallet: key,
            reason: e.to_string(),
        })?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl UserStore for SurrealUserStore {
    async fn find_by_wallet(&self, address: &str) -> StoreResult<Option<User>> {
        let key = normalize_wallet(address);
        if key.is_empty() {
            return Ok(None);
        }
        Ok(self.fetch(key).await?.map(UserRecord::into_user))
    }

    async fn save(&self, user: &User) -> StoreResult<()> {
        let row = UserRecord::from_user(user).ok_or(StoreError::MissingWallet)?;
        let key = row.wallet_key.clone();

        if self.fetch(key.clone()).await?.is_some() {
            debug!(wallet = %key, "updating user");
            self.db
                .query("UPDATE users CONTENT $row WHERE wallet_key = $key")
                .bind(("row", row))
                .bind(("key", key))
                .await?
                .check()?;
        } else {
            debug!(wallet = %key, "creating user");
            let _created: Option<UserRecord> = self.db.create("users").content(row).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn undecodable_row_is_reported_as_corrupt() {
        let store = SurrealUserStore::in_memory().await.unwrap();
        store
            .db
            .query("CREATE users CONTENT { wallet_key: '0xbad', wallet_address: 42 }")
            .await
            .unwrap()
            .check()
            .unwrap();

        let err = store.find_by_wallet("0xBAD").await.unwrap_err();
        match err {
            StoreError::Corrupt { wallet, .. } => assert_eq!(wallet, "0xbad"),
            other => panic!("expected corrupt record, got {other:?}"),
        }
    }
}
