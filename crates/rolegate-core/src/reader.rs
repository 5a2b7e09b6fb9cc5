//! Contract Reader: typed, time-bounded view reads for one wallet.
//!
//! Every read takes the wallet as `Option<&str>`. An absent or blank wallet
//! short-circuits to the zero/empty value without touching the client.

use std::sync::Arc;
use std::time::Duration;

use chain_reader::{
    parse_address, Address, BreedingPair, ContractCall, ContractClient, ContractMethod,
    ContractValue, TokenId,
};
use serde::{Deserialize, Serialize};

use crate::domain::ContractCallError;
use crate::obs;

/// Result of a single contract read.
pub type ReadResult<T> = std::result::Result<T, ContractCallError>;

/// Reader settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Upper bound for each individual client call
    #[serde(with = "duration_ms", rename = "call_timeout_ms")]
    pub call_timeout: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl ReaderConfig {
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Staking contract generation; each exposes its staked list under a
/// different method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakingGeneration {
    V1,
    V2,
}

impl StakingGeneration {
    fn method(&self, staker: Address) -> ContractMethod {
        match self {
            StakingGeneration::V1 => ContractMethod::GetTokensStaked { staker },
            StakingGeneration::V2 => ContractMethod::TokensStaked { staker },
        }
    }

    fn method_name(&self) -> &'static str {
        match self {
            StakingGeneration::V1 => "getTokensStaked",
            StakingGeneration::V2 => "tokensStaked",
        }
    }
}

/// Read-only accessor over a [`ContractClient`].
#[derive(Clone)]
pub struct ContractReader {
    client: Arc<dyn ContractClient>,
    config: ReaderConfig,
}

impl ContractReader {
    pub fn new(client: Arc<dyn ContractClient>, config: ReaderConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Token balance of `wallet` on an ERC-721 contract.
    pub async fn balance_of(&self, contract: Address, wallet: Option<&str>) -> ReadResult<u64> {
        let Some(owner) = wallet_address(wallet)? else {
            obs::emit_contract_read_skipped(&contract, "balanceOf");
            return Ok(0);
        };

        let method = ContractMethod::BalanceOf { owner };
        let name = method.name();
        let balance = self.call(contract, method).await?.into_count(name)?;
        obs::emit_contract_read(&contract, name, &owner.to_string(), &balance);
        Ok(balance)
    }

    /// Token ids `wallet` has locked in a staking contract.
    pub async fn staked_tokens(
        &self,
        contract: Address,
        generation: StakingGeneration,
        wallet: Option<&str>,
    ) -> ReadResult<Vec<TokenId>> {
        let Some(staker) = wallet_address(wallet)? else {
            obs::emit_contract_read_skipped(&contract, generation.method_name());
            return Ok(Vec::new());
        };

        let method = generation.method(staker);
        let name = method.name();
        let tokens = self.call(contract, method).await?.into_tokens(name)?;
        obs::emit_contract_read(&contract, name, &staker.to_string(), &tokens);
        Ok(tokens)
    }

    /// Every breeding event recorded for `wallet`, in index order.
    ///
    /// Reads the event count, then fetches each event one at a time.
    pub async fn breeding_pairs(
        &self,
        contract: Address,
        wallet: Option<&str>,
    ) -> ReadResult<Vec<BreedingPair>> {
        let Some(owner) = wallet_address(wallet)? else {
            obs::emit_contract_read_skipped(&contract, "getBreedingEventsLengthByAddress");
            return Ok(Vec::new());
        };

        let length_method = ContractMethod::BreedingEventsLength { owner };
        let length_name = length_method.name();
        let count = self
            .call(contract, length_method)
            .await?
            .into_count(length_name)?;
        obs::emit_contract_read(&contract, length_name, &owner.to_string(), &count);

        let mut pairs = Vec::new();
        for index in 0..count {
            let method = ContractMethod::BreedingEventAt { owner, index };
            let name = method.name();
            let pair = self.call(contract, method).await?.into_pair(name)?;
            obs::emit_contract_read(&contract, name, &owner.to_string(), &pair);
            pairs.push(pair);
        }
        Ok(pairs)
    }

    async fn call(&self, address: Address, method: ContractMethod) -> ReadResult<ContractValue> {
        let call = ContractCall::new(address, method);
        match tokio::time::timeout(self.config.call_timeout, self.client.call(&call)).await {
            Ok(result) => result,
            Err(_) => Err(ContractCallError::Timeout {
                method: call.method.name().to_string(),
                after_ms: self.config.call_timeout.as_millis() as u64,
            }),
        }
    }
}

/// `None` for an absent or blank wallet, the parsed address otherwise.
fn wallet_address(wallet: Option<&str>) -> ReadResult<Option<Address>> {
    match wallet.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_address(raw).map(Some),
    }
}
