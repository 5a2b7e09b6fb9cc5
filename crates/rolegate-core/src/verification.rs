//! Post-signature sign-in flow: link the wallet, run the rules, store status.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rolegate_state::{User, UserStore};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::Result;
use crate::obs;
use crate::rules::RuleExecutor;

/// A sign-in whose signature has already been checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSignIn {
    pub wallet_address: String,
    pub discord_user_id: String,
    pub verified_at: DateTime<Utc>,
}

impl VerifiedSignIn {
    /// A sign-in verified now.
    pub fn now(wallet_address: impl Into<String>, discord_user_id: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            discord_user_id: discord_user_id.into(),
            verified_at: Utc::now(),
        }
    }
}

/// Loads or creates the user for a sign-in, runs every rule and saves the
/// resulting status.
#[derive(Clone)]
pub struct VerificationService {
    store: Arc<dyn UserStore>,
    executor: RuleExecutor,
}

impl VerificationService {
    pub fn new(store: Arc<dyn UserStore>, executor: RuleExecutor) -> Self {
        Self { store, executor }
    }

    pub fn executor(&self) -> &RuleExecutor {
        &self.executor
    }

    /// Run one verification and return the saved user.
    ///
    /// Only store failures are returned; contract and directory failures are
    /// logged and reflected in the stored status.
    pub async fn verify(&self, sign_in: VerifiedSignIn) -> Result<User> {
        let verification_id = Uuid::new_v4().to_string();
        let span = obs::verification_span(&verification_id, &sign_in.wallet_address);
        self.verify_inner(sign_in).instrument(span).await
    }

    async fn verify_inner(&self, sign_in: VerifiedSignIn) -> Result<User> {
        let started = Instant::now();
        obs::emit_verification_started(
            &sign_in.wallet_address,
            &sign_in.discord_user_id,
            self.executor.rules().len(),
        );

        let mut user = self
            .store
            .find_by_wallet(&sign_in.wallet_address)
            .await?
            .unwrap_or_else(|| User::new(sign_in.wallet_address.clone()));
        user.discord_user_id = Some(sign_in.discord_user_id);
        user.wallet_address = Some(sign_in.wallet_address);
        user.last_verified_at = Some(sign_in.verified_at);

        let outcomes = self.executor.run(&user).await;
        let decisions = outcomes.iter().map(|o| o.decisions.len()).sum();
        user.status = serde_json::to_value(&outcomes)?;

        self.store.save(&user).await?;

        obs::emit_verification_finished(
            user.wallet().unwrap_or_default(),
            decisions,
            started.elapsed().as_millis() as u64,
        );
        Ok(user)
    }
}
