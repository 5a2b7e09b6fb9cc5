//! Entitlement rules: one set of contracts plus the roles evaluated on them.

use discord_directory::DiscordUser;
use rolegate_state::User;
use tracing::{error, instrument};

use crate::aggregator::HoldingAggregator;
use crate::domain::{HoldingsSnapshot, RoleDecision, RolegateError, RuleOutcome};
use crate::evaluator::EntitlementEvaluator;

/// A named rule: aggregate holdings, then evaluate the rule's roles.
#[derive(Clone)]
pub struct EntitlementRule {
    name: String,
    aggregator: HoldingAggregator,
    evaluator: EntitlementEvaluator,
}

impl EntitlementRule {
    pub fn new(
        name: impl Into<String>,
        aggregator: HoldingAggregator,
        evaluator: EntitlementEvaluator,
    ) -> Self {
        Self {
            name: name.into(),
            aggregator,
            evaluator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluator(&self) -> &EntitlementEvaluator {
        &self.evaluator
    }

    /// Holdings of the user's wallet on this rule's contracts.
    pub async fn check(&self, user: &User) -> HoldingsSnapshot {
        self.aggregator.check(user.wallet()).await
    }

    /// Decide and apply this rule's roles from an existing snapshot.
    ///
    /// A user with no linked Discord account gets no decisions.
    pub async fn execute(&self, user: &User, snapshot: &HoldingsSnapshot) -> Vec<RoleDecision> {
        let Some(discord_id) = user.discord_user_id.as_deref() else {
            let err = RolegateError::MissingDiscordUser;
            error!(rule = %self.name, wallet = ?user.wallet(), error = %err, "cannot sync roles");
            return Vec::new();
        };
        self.evaluator
            .execute(&DiscordUser::new(discord_id), snapshot)
            .await
    }

    /// `check` followed by `execute`.
    #[instrument(skip_all, fields(rule = %self.name))]
    pub async fn evaluate(&self, user: &User) -> Vec<RoleDecision> {
        let snapshot = self.check(user).await;
        self.execute(user, &snapshot).await
    }
}

/// Runs every configured rule for a user, in configuration order.
#[derive(Clone, Default)]
pub struct RuleExecutor {
    rules: Vec<EntitlementRule>,
}

impl RuleExecutor {
    pub fn new(rules: Vec<EntitlementRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[EntitlementRule] {
        &self.rules
    }

    pub async fn run(&self, user: &User) -> Vec<RuleOutcome> {
        let mut outcomes = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            outcomes.push(RuleOutcome {
                rule: rule.name().to_string(),
                decisions: rule.evaluate(user).await,
            });
        }
        outcomes
    }
}
