//! Entitlement Evaluator: turn a holdings snapshot into role decisions.

use discord_directory::{DiscordUser, Role};
use tracing::instrument;

use crate::domain::{HoldingsSnapshot, RoleDecision, RolePolicy, RolegateError};
use crate::obs;
use crate::synchronizer::RoleSynchronizer;

/// Evaluates a fixed list of role policies for one member at a time.
///
/// Each role is evaluated on its own: a role that cannot be resolved, or
/// whose holder count cannot be read, is logged and skipped while the
/// remaining roles still produce decisions.
#[derive(Clone)]
pub struct EntitlementEvaluator {
    policies: Vec<RolePolicy>,
    synchronizer: RoleSynchronizer,
}

impl EntitlementEvaluator {
    pub fn new(policies: Vec<RolePolicy>, synchronizer: RoleSynchronizer) -> Self {
        Self {
            policies,
            synchronizer,
        }
    }

    pub fn policies(&self) -> &[RolePolicy] {
        &self.policies
    }

    /// Decide and apply every configured role for `user`.
    #[instrument(skip_all, fields(user = %user, roles = self.policies.len()))]
    pub async fn execute(&self, user: &DiscordUser, snapshot: &HoldingsSnapshot) -> Vec<RoleDecision> {
        let mut decisions = Vec::with_capacity(self.policies.len());

        for policy in &self.policies {
            match self.evaluate_role(user, policy, snapshot).await {
                Ok(decision) => decisions.push(decision),
                Err(err) => {
                    obs::emit_role_evaluation_failed(&policy.role_name, &policy.role_id, &err)
                }
            }
        }

        decisions
    }

    async fn evaluate_role(
        &self,
        user: &DiscordUser,
        policy: &RolePolicy,
        snapshot: &HoldingsSnapshot,
    ) -> Result<RoleDecision, RolegateError> {
        let role = self.resolve(policy).await?;
        let qualifies = policy.qualifies(snapshot);
        let role_available = match policy.capacity.max_holders() {
            None => true,
            Some(_) => {
                let holders = self
                    .synchronizer
                    .directory()
                    .current_holder_count(&role.id)
                    .await?;
                policy.capacity.is_available(holders)
            }
        };

        let outcome = self
            .synchronizer
            .manage_role(user, Some(&role), &policy.role_name, qualifies, role_available)
            .await;

        Ok(RoleDecision {
            role_name: policy.role_name.clone(),
            role_id: policy.role_id.clone(),
            qualifies,
            role_available,
            evidence: policy.evidence(snapshot),
            outcome,
        })
    }

    async fn resolve(&self, policy: &RolePolicy) -> Result<Role, RolegateError> {
        self.synchronizer
            .directory()
            .fetch_role(&policy.role_id)
            .await?
            .ok_or_else(|| RolegateError::RoleNotFound {
                role_name: policy.role_name.clone(),
                role_id: policy.role_id.clone(),
            })
    }
}
