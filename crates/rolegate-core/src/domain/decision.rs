//! Role decisions: the per-role outcome of one verification.

use serde::{Deserialize, Serialize};

use super::holdings::HoldingsSnapshot;

/// What the synchronizer did with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Role was added
    Granted,
    /// Member qualified and already held the role
    AlreadyHeld,
    /// Member qualified but the role is at capacity; nothing changed
    CapacityExceeded,
    /// Role was removed
    Revoked,
    /// Member does not qualify and did not hold the role
    NotHeld,
    /// No resolved role to act on
    RoleMissing,
    /// The directory call failed; nothing is known to have changed
    Failed { reason: String },
}

impl SyncOutcome {
    /// Whether the member holds the role as a result of this sync.
    pub fn holds_role(&self) -> bool {
        matches!(self, SyncOutcome::Granted | SyncOutcome::AlreadyHeld)
    }
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::Granted => f.write_str("granted"),
            SyncOutcome::AlreadyHeld => f.write_str("already_held"),
            SyncOutcome::CapacityExceeded => f.write_str("capacity_exceeded"),
            SyncOutcome::Revoked => f.write_str("revoked"),
            SyncOutcome::NotHeld => f.write_str("not_held"),
            SyncOutcome::RoleMissing => f.write_str("role_missing"),
            SyncOutcome::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome for one (user, role) pair in one verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDecision {
    pub role_name: String,
    pub role_id: String,
    pub qualifies: bool,
    pub role_available: bool,
    /// The holdings the qualification was computed from
    pub evidence: HoldingsSnapshot,
    pub outcome: SyncOutcome,
}

/// All role decisions produced by one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub decisions: Vec<RoleDecision>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_role_only_for_grant_or_held() {
        assert!(SyncOutcome::Granted.holds_role());
        assert!(SyncOutcome::AlreadyHeld.holds_role());
        assert!(!SyncOutcome::CapacityExceeded.holds_role());
        assert!(!SyncOutcome::Revoked.holds_role());
        assert!(!SyncOutcome::NotHeld.holds_role());
        assert!(!SyncOutcome::RoleMissing.holds_role());
        assert!(!SyncOutcome::Failed {
            reason: "x".to_string()
        }
        .holds_role());
    }

    #[test]
    fn outcome_serializes_with_action_tag() {
        let json = serde_json::to_value(SyncOutcome::Failed {
            reason: "Missing Permissions".to_string(),
        })
        .unwrap();
        assert_eq!(json["action"], "failed");
        assert_eq!(json["reason"], "Missing Permissions");

        let json = serde_json::to_value(SyncOutcome::CapacityExceeded).unwrap();
        assert_eq!(json["action"], "capacity_exceeded");
    }
}
