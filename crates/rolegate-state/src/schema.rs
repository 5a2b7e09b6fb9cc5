//! SurrealDB row types for rolegate.
//!
//! Rows are converted to and from `storage_traits::User` at the store
//! boundary so the rest of the workspace never sees SurrealDB types.

/// Module for serializing optional chrono DateTime to SurrealDB datetime format
mod surreal_datetime_opt {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => {
                let sd = SurrealDatetime::from(*d);
                serde::Serialize::serialize(&Some(sd), serializer)
            }
            None => serde::Serialize::serialize(&None::<SurrealDatetime>, serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = Option::<SurrealDatetime>::deserialize(deserializer)?;
        Ok(sd.map(DateTime::from))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage_traits::{normalize_wallet, User};

/// User row - one per wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// SurrealDB record ID
    #[serde(default, skip_serializing)]
    pub id: Option<surrealdb::sql::Thing>,
    /// Lowercased wallet address (unique index)
    pub wallet_key: String,
    /// Wallet address as the signer presented it
    pub wallet_address: String,
    /// Linked Discord user id
    pub discord_user_id: Option<String>,
    /// Last successful verification
    #[serde(default, with = "surreal_datetime_opt")]
    pub last_verified_at: Option<DateTime<Utc>>,
    /// Last verification status (JSON)
    #[serde(default)]
    pub status: serde_json::Value,
}

impl UserRecord {
    /// Build a row from a user. Returns `None` when the user has no wallet.
    pub fn from_user(user: &User) -> Option<Self> {
        let wallet = user.wallet()?;
        Some(UserRecord {
            id: None,
            wallet_key: normalize_wallet(wallet),
            wallet_address: wallet.to_string(),
            discord_user_id: user.discord_user_id.clone(),
            last_verified_at: user.last_verified_at,
            status: user.status.clone(),
        })
    }

    /// Convert the row back into the storage-agnostic user type
    pub fn into_user(self) -> User {
        User {
            wallet_address: Some(self.wallet_address),
            discord_user_id: self.discord_user_id,
            last_verified_at: self.last_verified_at,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_keys_by_lowercase_wallet() {
        let user = User {
            wallet_address: Some("0xAbCd".to_string()),
            discord_user_id: Some("42".to_string()),
            last_verified_at: None,
            status: json!([]),
        };

        let row = UserRecord::from_user(&user).unwrap();
        assert_eq!(row.wallet_key, "0xabcd");
        assert_eq!(row.wallet_address, "0xAbCd");
        assert_eq!(row.into_user(), user);
    }

    #[test]
    fn row_requires_wallet() {
        assert!(UserRecord::from_user(&User::default()).is_none());
    }

    #[test]
    fn row_serializes_without_record_id() {
        let row = UserRecord::from_user(&User::new("0x01")).unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"wallet_key\":\"0x01\""));
    }
}
