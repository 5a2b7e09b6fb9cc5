//! Trait contract tests for UserStore.
//!
//! Every test runs against both the in-memory fake and the SurrealDB store
//! (in-memory engine). Any conforming implementation must pass these.

use chrono::{TimeZone, Utc};
use rolegate_state::fakes::MemoryUserStore;
use rolegate_state::{StoreError, SurrealUserStore, User, UserStore};
use serde_json::json;

async fn stores() -> Vec<(&'static str, Box<dyn UserStore>)> {
    vec![
        ("memory", Box::new(MemoryUserStore::new())),
        (
            "surreal",
            Box::new(SurrealUserStore::in_memory().await.unwrap()),
        ),
    ]
}

fn sample_user(wallet: &str) -> User {
    User {
        wallet_address: Some(wallet.to_string()),
        discord_user_id: Some("123456789012345678".to_string()),
        last_verified_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        status: json!([{"rule": "genesis", "decisions": []}]),
    }
}

#[tokio::test]
async fn find_missing_wallet_returns_none() {
    for (name, store) in stores().await {
        let found = store.find_by_wallet("0xdeadbeef").await.unwrap();
        assert!(found.is_none(), "{name}");
    }
}

#[tokio::test]
async fn save_then_find_round_trips_user() {
    for (name, store) in stores().await {
        let user = sample_user("0x00000000000000000000000000000000000000aa");
        store.save(&user).await.unwrap();

        let found = store
            .find_by_wallet("0x00000000000000000000000000000000000000aa")
            .await
            .unwrap();
        assert_eq!(found, Some(user), "{name}");
    }
}

#[tokio::test]
async fn find_is_case_insensitive() {
    for (name, store) in stores().await {
        let user = sample_user("0xAbCdEf0000000000000000000000000000000001");
        store.save(&user).await.unwrap();

        let found = store
            .find_by_wallet("0xabcdef0000000000000000000000000000000001")
            .await
            .unwrap()
            .expect(name);
        assert_eq!(
            found.wallet_address.as_deref(),
            Some("0xAbCdEf0000000000000000000000000000000001")
        );
    }
}

#[tokio::test]
async fn save_upserts_existing_wallet() {
    for (name, store) in stores().await {
        let mut user = sample_user("0x00000000000000000000000000000000000000bb");
        store.save(&user).await.unwrap();

        user.status = json!({"updated": true});
        user.discord_user_id = Some("999".to_string());
        store.save(&user).await.unwrap();

        let found = store
            .find_by_wallet("0x00000000000000000000000000000000000000BB")
            .await
            .unwrap()
            .expect(name);
        assert_eq!(found.status, json!({"updated": true}), "{name}");
        assert_eq!(found.discord_user_id.as_deref(), Some("999"), "{name}");
    }
}

#[tokio::test]
async fn save_without_wallet_is_rejected() {
    for (name, store) in stores().await {
        let err = store.save(&User::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingWallet), "{name}");

        let blank = User::new("  ");
        let err = store.save(&blank).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingWallet), "{name}");
    }
}

#[tokio::test]
async fn blank_lookup_returns_none() {
    for (name, store) in stores().await {
        store.save(&sample_user("0x01")).await.unwrap();
        assert!(store.find_by_wallet("").await.unwrap().is_none(), "{name}");
    }
}

#[tokio::test]
async fn memory_store_counts_saves() {
    let store = MemoryUserStore::new().with_user(sample_user("0x02"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.save_count(), 0);

    store.save(&sample_user("0x03")).await.unwrap();
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.len(), 2);
}
