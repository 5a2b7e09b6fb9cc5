//! Holding Aggregator: one snapshot of everything a wallet holds.
//!
//! Each category is read in isolation. A category whose read fails is left
//! empty and listed in [`HoldingsSnapshot::failed_categories`]; a category
//! whose contract is not configured is left empty without a call.

use chain_reader::{Address, TokenId};
use tracing::instrument;

use crate::domain::{ContractCallError, HoldingCategory, HoldingsSnapshot};
use crate::obs;
use crate::reader::{ContractReader, ReadResult, StakingGeneration};

/// Contract addresses one rule reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleContracts {
    pub genesis: Option<Address>,
    pub baby: Option<Address>,
    pub staking_v1: Option<Address>,
    pub staking_v2: Option<Address>,
    pub breeding: Option<Address>,
}

impl RuleContracts {
    /// The contract backing `category`, if configured.
    pub fn address_for(&self, category: HoldingCategory) -> Option<Address> {
        match category {
            HoldingCategory::Genesis => self.genesis,
            HoldingCategory::Baby => self.baby,
            HoldingCategory::StakingV1 => self.staking_v1,
            HoldingCategory::StakingV2 => self.staking_v2,
            HoldingCategory::Breeding => self.breeding,
        }
    }
}

/// Builds a [`HoldingsSnapshot`] from a fixed set of contracts.
#[derive(Clone)]
pub struct HoldingAggregator {
    reader: ContractReader,
    contracts: RuleContracts,
}

impl HoldingAggregator {
    pub fn new(reader: ContractReader, contracts: RuleContracts) -> Self {
        Self { reader, contracts }
    }

    pub fn contracts(&self) -> &RuleContracts {
        &self.contracts
    }

    /// Read every configured category for `wallet`.
    #[instrument(skip(self))]
    pub async fn check(&self, wallet: Option<&str>) -> HoldingsSnapshot {
        let mut snapshot = HoldingsSnapshot::default();

        for category in HoldingCategory::ALL {
            let Some(contract) = self.contracts.address_for(category) else {
                continue;
            };
            if let Err(err) = self.read_category(&mut snapshot, category, contract, wallet).await {
                obs::emit_category_failed(category.as_str(), &err);
                snapshot.failed_categories.insert(category);
            }
        }

        snapshot
    }

    async fn read_category(
        &self,
        snapshot: &mut HoldingsSnapshot,
        category: HoldingCategory,
        contract: Address,
        wallet: Option<&str>,
    ) -> Result<(), ContractCallError> {
        match category {
            HoldingCategory::Genesis => {
                snapshot.genesis_tokens = self.presence(contract, wallet).await?.into_iter().collect();
            }
            HoldingCategory::Baby => {
                snapshot.baby_tokens = self.presence(contract, wallet).await?.into_iter().collect();
            }
            HoldingCategory::StakingV1 => {
                snapshot.staked_v1 = self
                    .reader
                    .staked_tokens(contract, StakingGeneration::V1, wallet)
                    .await?
                    .into_iter()
                    .collect();
            }
            HoldingCategory::StakingV2 => {
                snapshot.staked_v2 = self
                    .reader
                    .staked_tokens(contract, StakingGeneration::V2, wallet)
                    .await?
                    .into_iter()
                    .collect();
            }
            HoldingCategory::Breeding => {
                snapshot.breeding_parents = self
                    .reader
                    .breeding_pairs(contract, wallet)
                    .await?
                    .into_iter()
                    .flat_map(|pair| [pair.parent_id1, pair.parent_id2])
                    .collect();
            }
        }
        Ok(())
    }

    /// Balance reads only tell presence: a non-zero balance becomes the
    /// placeholder id.
    async fn presence(&self, contract: Address, wallet: Option<&str>) -> ReadResult<Option<TokenId>> {
        let balance = self.reader.balance_of(contract, wallet).await?;
        Ok((balance > 0).then_some(TokenId::PLACEHOLDER))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chain_reader::fakes::ScriptedContractClient;
    use chain_reader::{parse_address, ContractMethod, ContractValue};

    use super::*;
    use crate::reader::ReaderConfig;

    const WALLET: &str = "0x00000000000000000000000000000000000000aa";

    fn addr(s: &str) -> Address {
        parse_address(s).unwrap()
    }

    #[tokio::test]
    async fn unconfigured_categories_are_skipped() {
        let genesis = addr("0xC7492fDE60f2eA4DBa3d7660e9B6F651b2841f00");
        let client = Arc::new(ScriptedContractClient::new().with_value(
            genesis,
            ContractMethod::BalanceOf {
                owner: addr(WALLET),
            },
            ContractValue::Count(4),
        ));
        let aggregator = HoldingAggregator::new(
            ContractReader::new(client.clone(), ReaderConfig::default()),
            RuleContracts {
                genesis: Some(genesis),
                ..Default::default()
            },
        );

        let snapshot = aggregator.check(Some(WALLET)).await;

        assert_eq!(
            snapshot.genesis_tokens.into_iter().collect::<Vec<_>>(),
            vec![TokenId::PLACEHOLDER]
        );
        assert!(snapshot.failed_categories.is_empty());
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_balance_is_empty() {
        let contracts = RuleContracts {
            baby: Some(addr("0x15cc16bfe6fac624247490aa29b6d632be549f00")),
            ..Default::default()
        };
        let aggregator = HoldingAggregator::new(
            ContractReader::new(Arc::new(ScriptedContractClient::new()), ReaderConfig::default()),
            contracts,
        );

        let snapshot = aggregator.check(Some(WALLET)).await;
        assert!(snapshot.is_empty());
    }
}
