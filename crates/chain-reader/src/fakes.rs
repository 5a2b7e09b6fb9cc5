//! In-memory fakes for the contract client (testing only)
//!
//! `ScriptedContractClient` answers calls from a table of scripted results and
//! records every call it receives, so tests can assert on call counts and
//! order without a node.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::call::{ContractCall, ContractMethod, ContractValue};
use crate::client::ContractClient;
use crate::error::ChainError;
use crate::Result;

/// A scripted answer for one call.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return this value
    Value(ContractValue),
    /// Fail with this error
    Fail(ChainError),
    /// Never answer
    Hang,
}

/// Contract client driven by a table of scripted answers.
///
/// Calls without a script behave like a wallet with no holdings: balances and
/// lengths are zero, staked lists are empty, and indexing a breeding event
/// reverts.
#[derive(Debug, Default)]
pub struct ScriptedContractClient {
    answers: Mutex<HashMap<ContractCall, Scripted>>,
    calls: Mutex<Vec<ContractCall>>,
}

impl ScriptedContractClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer for `method` on `address`.
    pub fn with(self, address: Address, method: ContractMethod, answer: Scripted) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(ContractCall::new(address, method), answer);
        self
    }

    /// Script a successful value.
    pub fn with_value(self, address: Address, method: ContractMethod, value: ContractValue) -> Self {
        self.with(address, method, Scripted::Value(value))
    }

    /// Script a failure.
    pub fn with_failure(self, address: Address, method: ContractMethod, error: ChainError) -> Self {
        self.with(address, method, Scripted::Fail(error))
    }

    /// Script a call that never completes.
    pub fn with_hang(self, address: Address, method: ContractMethod) -> Self {
        self.with(address, method, Scripted::Hang)
    }

    /// Total number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().unwrap().clone()
    }

    fn unscripted(call: &ContractCall) -> Result<ContractValue> {
        match call.method {
            ContractMethod::BalanceOf { .. } | ContractMethod::BreedingEventsLength { .. } => {
                Ok(ContractValue::Count(0))
            }
            ContractMethod::GetTokensStaked { .. } | ContractMethod::TokensStaked { .. } => {
                Ok(ContractValue::Tokens(Vec::new()))
            }
            ContractMethod::BreedingEventAt { .. } => Err(ChainError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ContractClient for ScriptedContractClient {
    async fn call(&self, call: &ContractCall) -> Result<ContractValue> {
        self.calls.lock().unwrap().push(call.clone());
        let answer = self.answers.lock().unwrap().get(call).cloned();

        match answer {
            Some(Scripted::Value(value)) => Ok(value),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Self::unscripted(call),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{parse_address, TokenId};

    fn addr(s: &str) -> Address {
        parse_address(s).unwrap()
    }

    #[tokio::test]
    async fn scripted_answers_and_defaults() {
        let contract = addr("0x5f7BA84c7984Aa5ef329B66E313498F0aEd6d23A");
        let wallet = addr("0x00000000000000000000000000000000000000aa");
        let client = ScriptedContractClient::new().with_value(
            contract,
            ContractMethod::GetTokensStaked { staker: wallet },
            ContractValue::Tokens(vec![TokenId(5)]),
        );

        let scripted = client
            .call(&ContractCall::new(
                contract,
                ContractMethod::GetTokensStaked { staker: wallet },
            ))
            .await
            .unwrap();
        assert_eq!(scripted, ContractValue::Tokens(vec![TokenId(5)]));

        let default = client
            .call(&ContractCall::new(
                contract,
                ContractMethod::BalanceOf { owner: wallet },
            ))
            .await
            .unwrap();
        assert_eq!(default, ContractValue::Count(0));
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn unscripted_breeding_index_reverts() {
        let contract = addr("0x15cc16bfe6fac624247490aa29b6d632be549f00");
        let wallet = addr("0x00000000000000000000000000000000000000aa");
        let client = ScriptedContractClient::new();

        let err = client
            .call(&ContractCall::new(
                contract,
                ContractMethod::BreedingEventAt {
                    owner: wallet,
                    index: 0,
                },
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Rpc { code: 3, .. }));
    }
}
