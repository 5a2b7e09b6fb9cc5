//! Role policies: which holdings qualify for a role and how many may hold it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::holdings::{HoldingCategory, HoldingsSnapshot};

/// How many members may hold a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleCapacity {
    /// No cap; the role is always available
    #[default]
    Unlimited,
    /// At most `max_holders` members
    Capped { max_holders: u64 },
}

impl RoleCapacity {
    /// Whether another member may receive the role given the current count.
    pub fn is_available(&self, current_holders: u64) -> bool {
        match self {
            RoleCapacity::Unlimited => true,
            RoleCapacity::Capped { max_holders } => current_holders < *max_holders,
        }
    }

    pub fn max_holders(&self) -> Option<u64> {
        match self {
            RoleCapacity::Unlimited => None,
            RoleCapacity::Capped { max_holders } => Some(*max_holders),
        }
    }
}

/// One configured role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicy {
    pub role_name: String,
    pub role_id: String,
    pub capacity: RoleCapacity,
    /// Holding any of these qualifies for the role
    pub qualifying: BTreeSet<HoldingCategory>,
}

impl RolePolicy {
    pub fn new(
        role_name: impl Into<String>,
        role_id: impl Into<String>,
        qualifying: impl IntoIterator<Item = HoldingCategory>,
    ) -> Self {
        Self {
            role_name: role_name.into(),
            role_id: role_id.into(),
            capacity: RoleCapacity::Unlimited,
            qualifying: qualifying.into_iter().collect(),
        }
    }

    pub fn with_capacity(mut self, capacity: RoleCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Pure qualification predicate over the snapshot.
    pub fn qualifies(&self, snapshot: &HoldingsSnapshot) -> bool {
        snapshot.holds_any(&self.qualifying)
    }

    /// The part of the snapshot this role's decision is based on.
    pub fn evidence(&self, snapshot: &HoldingsSnapshot) -> HoldingsSnapshot {
        snapshot.subset(&self.qualifying)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_reader::TokenId;

    fn primary() -> RolePolicy {
        RolePolicy::new(
            "genesis mice",
            "1",
            [
                HoldingCategory::Genesis,
                HoldingCategory::StakingV1,
                HoldingCategory::StakingV2,
                HoldingCategory::Breeding,
            ],
        )
    }

    #[test]
    fn qualifies_on_any_category() {
        let policy = primary();
        for category in [
            HoldingCategory::Genesis,
            HoldingCategory::StakingV1,
            HoldingCategory::StakingV2,
            HoldingCategory::Breeding,
        ] {
            let mut snapshot = HoldingsSnapshot::default();
            match category {
                HoldingCategory::Genesis => {
                    snapshot.genesis_tokens.insert(TokenId::PLACEHOLDER);
                }
                HoldingCategory::StakingV1 => {
                    snapshot.staked_v1.insert(TokenId(7));
                }
                HoldingCategory::StakingV2 => {
                    snapshot.staked_v2.insert(TokenId(7));
                }
                HoldingCategory::Breeding => snapshot.breeding_parents.push(TokenId(7)),
                HoldingCategory::Baby => unreachable!(),
            }
            assert!(policy.qualifies(&snapshot), "{category}");
        }
    }

    #[test]
    fn irrelevant_holdings_do_not_qualify() {
        let mut snapshot = HoldingsSnapshot::default();
        snapshot.baby_tokens.insert(TokenId::PLACEHOLDER);
        assert!(!primary().qualifies(&snapshot));
        assert!(!primary().qualifies(&HoldingsSnapshot::default()));
    }

    #[test]
    fn capacity_availability() {
        assert!(RoleCapacity::Unlimited.is_available(u64::MAX));
        let capped = RoleCapacity::Capped { max_holders: 10 };
        assert!(capped.is_available(9));
        assert!(!capped.is_available(10));
        assert!(!capped.is_available(11));
    }

    #[test]
    fn capacity_deserializes_tagged() {
        let capped: RoleCapacity =
            serde_json::from_str(r#"{"kind":"capped","max_holders":10000}"#).unwrap();
        assert_eq!(capped, RoleCapacity::Capped { max_holders: 10000 });
        let unlimited: RoleCapacity = serde_json::from_str(r#"{"kind":"unlimited"}"#).unwrap();
        assert_eq!(unlimited, RoleCapacity::Unlimited);
    }
}
