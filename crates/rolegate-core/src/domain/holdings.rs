//! Holdings snapshot: what a wallet holds across the configured contracts.

use std::collections::BTreeSet;

use chain_reader::TokenId;
use serde::{Deserialize, Serialize};

/// One kind of on-chain holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingCategory {
    /// Primary-collection NFTs held directly
    Genesis,
    /// Offspring-collection NFTs held directly
    Baby,
    /// Tokens locked in the first-generation staking contract
    StakingV1,
    /// Tokens locked in the second-generation staking contract
    StakingV2,
    /// Parents currently recorded in breeding events
    Breeding,
}

impl HoldingCategory {
    pub const ALL: [HoldingCategory; 5] = [
        HoldingCategory::Genesis,
        HoldingCategory::Baby,
        HoldingCategory::StakingV1,
        HoldingCategory::StakingV2,
        HoldingCategory::Breeding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HoldingCategory::Genesis => "genesis",
            HoldingCategory::Baby => "baby",
            HoldingCategory::StakingV1 => "staking_v1",
            HoldingCategory::StakingV2 => "staking_v2",
            HoldingCategory::Breeding => "breeding",
        }
    }
}

impl std::fmt::Display for HoldingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holdings of one wallet at one point in time.
///
/// Built fresh for every verification and never persisted. Genesis and baby
/// sets only ever contain [`TokenId::PLACEHOLDER`]: balance reads say whether
/// the wallet holds any, not which.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingsSnapshot {
    pub genesis_tokens: BTreeSet<TokenId>,
    pub baby_tokens: BTreeSet<TokenId>,
    pub staked_v1: BTreeSet<TokenId>,
    pub staked_v2: BTreeSet<TokenId>,
    /// Parent ids of every breeding event, flattened in fetch order
    pub breeding_parents: Vec<TokenId>,
    /// Categories whose contract read failed; they are reported empty
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub failed_categories: BTreeSet<HoldingCategory>,
}

impl HoldingsSnapshot {
    /// Whether the wallet holds anything in `category`.
    pub fn holds(&self, category: HoldingCategory) -> bool {
        match category {
            HoldingCategory::Genesis => !self.genesis_tokens.is_empty(),
            HoldingCategory::Baby => !self.baby_tokens.is_empty(),
            HoldingCategory::StakingV1 => !self.staked_v1.is_empty(),
            HoldingCategory::StakingV2 => !self.staked_v2.is_empty(),
            HoldingCategory::Breeding => !self.breeding_parents.is_empty(),
        }
    }

    /// Whether any of `categories` is non-empty.
    pub fn holds_any<'a>(&self, categories: impl IntoIterator<Item = &'a HoldingCategory>) -> bool {
        categories.into_iter().any(|c| self.holds(*c))
    }

    /// A copy restricted to `categories`; everything else is left empty.
    pub fn subset(&self, categories: &BTreeSet<HoldingCategory>) -> HoldingsSnapshot {
        let keep = |c: HoldingCategory| categories.contains(&c);
        HoldingsSnapshot {
            genesis_tokens: if keep(HoldingCategory::Genesis) {
                self.genesis_tokens.clone()
            } else {
                BTreeSet::new()
            },
            baby_tokens: if keep(HoldingCategory::Baby) {
                self.baby_tokens.clone()
            } else {
                BTreeSet::new()
            },
            staked_v1: if keep(HoldingCategory::StakingV1) {
                self.staked_v1.clone()
            } else {
                BTreeSet::new()
            },
            staked_v2: if keep(HoldingCategory::StakingV2) {
                self.staked_v2.clone()
            } else {
                BTreeSet::new()
            },
            breeding_parents: if keep(HoldingCategory::Breeding) {
                self.breeding_parents.clone()
            } else {
                Vec::new()
            },
            failed_categories: self
                .failed_categories
                .intersection(categories)
                .copied()
                .collect(),
        }
    }

    /// True when every category is empty and nothing failed.
    pub fn is_empty(&self) -> bool {
        !self.holds_any(&HoldingCategory::ALL) && self.failed_categories.is_empty()
    }
}
