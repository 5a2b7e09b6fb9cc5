//! SurrealDB schema initialization
//!
//! Sets up the `users` table. Safe to run on every connection.

use crate::error::StateError;
use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize all rolegate tables in SurrealDB (idempotent)
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing rolegate SurrealDB schema");
    init_users_table(db).await?;
    Ok(())
}

/// Initialize `users` table
///
/// Schema:
/// ```text
/// TABLE users {
///   wallet_key:        STRING (unique, lowercased wallet)
///   wallet_address:    STRING
///   discord_user_id:   STRING? (indexed)
///   last_verified_at:  DATETIME?
///   status:            ANY (last verification outcome)
/// }
/// ```
async fn init_users_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing users table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS users SCHEMALESS;

        -- One user per wallet
        DEFINE INDEX IF NOT EXISTS idx_wallet_key ON TABLE users COLUMNS wallet_key UNIQUE;

        -- Reverse lookup from Discord account
        DEFINE INDEX IF NOT EXISTS idx_discord_user_id ON TABLE users COLUMNS discord_user_id;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StateError::SchemaSetup(format!("users table: {e}")))?
        .check()
        .map_err(|e| StateError::SchemaSetup(format!("users table: {e}")))?;

    Ok(())
}
