//! Typed contract calls and their decoded values.
//!
//! A [`ContractCall`] names the contract and the view method (with its
//! arguments). [`ContractMethod::encode`] produces calldata and
//! [`ContractMethod::decode`] turns raw return data into a [`ContractValue`].

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::contracts::{IBreeding, IErc721, IStakingV1, IStakingV2};
use crate::error::ChainError;
use crate::Result;

/// On-chain token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl TokenId {
    /// Stand-in id recorded when only a balance is known.
    ///
    /// Balance reads do not enumerate ids, so a non-zero balance is recorded as
    /// this single element; only presence is meaningful.
    pub const PLACEHOLDER: TokenId = TokenId(1);

    fn from_u256(method: &str, value: U256) -> Result<Self> {
        u64::try_from(value)
            .map(TokenId)
            .map_err(|_| ChainError::OutOfRange {
                method: method.to_string(),
                value: value.to_string(),
            })
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One breeding event: the two parents that produced an offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreedingPair {
    pub parent_id1: TokenId,
    pub parent_id2: TokenId,
}

/// A view method with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContractMethod {
    /// `balanceOf(address)` on an ERC-721 collection
    BalanceOf { owner: Address },
    /// `getTokensStaked(address)` on staking v1
    GetTokensStaked { staker: Address },
    /// `tokensStaked(address)` on staking v2
    TokensStaked { staker: Address },
    /// `getBreedingEventsLengthByAddress(address)`
    BreedingEventsLength { owner: Address },
    /// `_addressToBreedingEvents(address, uint256)`
    BreedingEventAt { owner: Address, index: u64 },
}

impl ContractMethod {
    /// Solidity function name, used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            ContractMethod::BalanceOf { .. } => "balanceOf",
            ContractMethod::GetTokensStaked { .. } => "getTokensStaked",
            ContractMethod::TokensStaked { .. } => "tokensStaked",
            ContractMethod::BreedingEventsLength { .. } => "getBreedingEventsLengthByAddress",
            ContractMethod::BreedingEventAt { .. } => "_addressToBreedingEvents",
        }
    }

    /// ABI-encode the call (selector + arguments).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ContractMethod::BalanceOf { owner } => {
                IErc721::balanceOfCall { owner: *owner }.abi_encode()
            }
            ContractMethod::GetTokensStaked { staker } => {
                IStakingV1::getTokensStakedCall { staker: *staker }.abi_encode()
            }
            ContractMethod::TokensStaked { staker } => {
                IStakingV2::tokensStakedCall { staker: *staker }.abi_encode()
            }
            ContractMethod::BreedingEventsLength { owner } => {
                IBreeding::getBreedingEventsLengthByAddressCall { owner: *owner }.abi_encode()
            }
            ContractMethod::BreedingEventAt { owner, index } => {
                IBreeding::_addressToBreedingEventsCall {
                    owner: *owner,
                    index: U256::from(*index),
                }
                .abi_encode()
            }
        }
    }

    /// Decode raw return data for this method.
    pub fn decode(&self, data: &[u8]) -> Result<ContractValue> {
        let method = self.name();
        let decode_err = |e: alloy_sol_types::Error| ChainError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        };

        match self {
            ContractMethod::BalanceOf { .. } => {
                let ret = IErc721::balanceOfCall::abi_decode_returns(data, false)
                    .map_err(decode_err)?;
                count_from_u256(method, ret._0).map(ContractValue::Count)
            }
            ContractMethod::GetTokensStaked { .. } => {
                let ret = IStakingV1::getTokensStakedCall::abi_decode_returns(data, false)
                    .map_err(decode_err)?;
                tokens_from_u256s(method, ret._0).map(ContractValue::Tokens)
            }
            ContractMethod::TokensStaked { .. } => {
                let ret = IStakingV2::tokensStakedCall::abi_decode_returns(data, false)
                    .map_err(decode_err)?;
                tokens_from_u256s(method, ret._0).map(ContractValue::Tokens)
            }
            ContractMethod::BreedingEventsLength { .. } => {
                let ret =
                    IBreeding::getBreedingEventsLengthByAddressCall::abi_decode_returns(data, false)
                        .map_err(decode_err)?;
                count_from_u256(method, ret._0).map(ContractValue::Count)
            }
            ContractMethod::BreedingEventAt { .. } => {
                let ret = IBreeding::_addressToBreedingEventsCall::abi_decode_returns(data, false)
                    .map_err(decode_err)?;
                Ok(ContractValue::Pair(BreedingPair {
                    parent_id1: TokenId::from_u256(method, ret.parentId1)?,
                    parent_id2: TokenId::from_u256(method, ret.parentId2)?,
                }))
            }
        }
    }
}

fn count_from_u256(method: &str, value: U256) -> Result<u64> {
    u64::try_from(value).map_err(|_| ChainError::OutOfRange {
        method: method.to_string(),
        value: value.to_string(),
    })
}

fn tokens_from_u256s(method: &str, values: Vec<U256>) -> Result<Vec<TokenId>> {
    values
        .into_iter()
        .map(|v| TokenId::from_u256(method, v))
        .collect()
}

/// A read against one contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractCall {
    pub address: Address,
    pub method: ContractMethod,
}

impl ContractCall {
    pub fn new(address: Address, method: ContractMethod) -> Self {
        Self { address, method }
    }
}

/// Decoded return value of a [`ContractCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractValue {
    /// A balance or a length
    Count(u64),
    /// A list of token ids
    Tokens(Vec<TokenId>),
    /// A single breeding event
    Pair(BreedingPair),
}

impl ContractValue {
    fn kind(&self) -> &'static str {
        match self {
            ContractValue::Count(_) => "count",
            ContractValue::Tokens(_) => "tokens",
            ContractValue::Pair(_) => "pair",
        }
    }

    /// Unwrap a count, or report the shape mismatch for `method`.
    pub fn into_count(self, method: &str) -> Result<u64> {
        match self {
            ContractValue::Count(n) => Ok(n),
            other => Err(ChainError::UnexpectedValue {
                method: method.to_string(),
                expected: "count",
                actual: other.kind(),
            }),
        }
    }

    /// Unwrap a token list, or report the shape mismatch for `method`.
    pub fn into_tokens(self, method: &str) -> Result<Vec<TokenId>> {
        match self {
            ContractValue::Tokens(ids) => Ok(ids),
            other => Err(ChainError::UnexpectedValue {
                method: method.to_string(),
                expected: "tokens",
                actual: other.kind(),
            }),
        }
    }

    /// Unwrap a breeding pair, or report the shape mismatch for `method`.
    pub fn into_pair(self, method: &str) -> Result<BreedingPair> {
        match self {
            ContractValue::Pair(pair) => Ok(pair),
            other => Err(ChainError::UnexpectedValue {
                method: method.to_string(),
                expected: "pair",
                actual: other.kind(),
            }),
        }
    }
}

/// Parse a wallet or contract address.
pub fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(n: u64) -> [u8; 32] {
        U256::from(n).to_be_bytes::<32>()
    }

    fn owner() -> Address {
        parse_address("0x15cc16bfe6fac624247490aa29b6d632be549f00").unwrap()
    }

    #[test]
    fn balance_of_encodes_erc721_selector() {
        let data = ContractMethod::BalanceOf { owner: owner() }.encode();
        assert_eq!(hex::encode(&data[..4]), "70a08231");
        assert_eq!(data.len(), 4 + 32);
    }

    #[test]
    fn decode_balance() {
        let method = ContractMethod::BalanceOf { owner: owner() };
        let value = method.decode(&word(3)).unwrap();
        assert_eq!(value, ContractValue::Count(3));
    }

    #[test]
    fn decode_staked_token_list() {
        // offset, length, then elements
        let mut data = Vec::new();
        data.extend_from_slice(&word(32));
        data.extend_from_slice(&word(2));
        data.extend_from_slice(&word(17));
        data.extend_from_slice(&word(4000));

        let method = ContractMethod::TokensStaked { staker: owner() };
        assert_eq!(
            method.decode(&data).unwrap(),
            ContractValue::Tokens(vec![TokenId(17), TokenId(4000)])
        );
    }

    #[test]
    fn decode_breeding_event_ignores_trailing_members() {
        let mut data = Vec::new();
        data.extend_from_slice(&word(11));
        data.extend_from_slice(&word(22));
        data.extend_from_slice(&word(9999));

        let method = ContractMethod::BreedingEventAt {
            owner: owner(),
            index: 0,
        };
        assert_eq!(
            method.decode(&data).unwrap(),
            ContractValue::Pair(BreedingPair {
                parent_id1: TokenId(11),
                parent_id2: TokenId(22),
            })
        );
    }

    #[test]
    fn decode_short_data_is_a_decode_error() {
        let method = ContractMethod::BalanceOf { owner: owner() };
        let err = method.decode(&[]).unwrap_err();
        assert!(matches!(err, ChainError::Decode { .. }));
    }

    #[test]
    fn oversized_token_id_is_out_of_range() {
        let data = U256::MAX.to_be_bytes::<32>();
        let method = ContractMethod::BalanceOf { owner: owner() };
        let err = method.decode(&data).unwrap_err();
        assert!(matches!(err, ChainError::OutOfRange { .. }));
    }

    #[test]
    fn value_shape_mismatch_is_reported() {
        let err = ContractValue::Count(1).into_tokens("tokensStaked").unwrap_err();
        assert_eq!(
            err,
            ChainError::UnexpectedValue {
                method: "tokensStaked".to_string(),
                expected: "tokens",
                actual: "count",
            }
        );
    }

    #[test]
    fn parse_address_rejects_garbage() {
        assert!(parse_address("not-an-address").is_err());
        assert!(parse_address(" 0xC7492fDE60f2eA4DBa3d7660e9B6F651b2841f00 ").is_ok());
    }
}
