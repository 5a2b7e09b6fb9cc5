//! Chain-Reader: read-only contract access for rolegate
//!
//! This crate provides the on-chain side of a holdings check: typed view
//! calls against NFT, staking and breeding contracts, their ABI encoding, and
//! a JSON-RPC `eth_call` client.
//!
//! ## Layer 1 - Collaborators
//!
//! ## Key Components
//!
//! - `ContractClient`: one view call in, one decoded value out
//! - `JsonRpcContractClient`: `eth_call` through an alloy HTTP provider
//! - `fakes::ScriptedContractClient`: canned answers and call counting for tests

pub mod call;
pub mod client;
pub mod contracts;
mod error;
pub mod fakes;
pub mod rpc;

pub use call::{
    parse_address, BreedingPair, ContractCall, ContractMethod, ContractValue,
    TokenId,
};
pub use client::ContractClient;
pub use error::ChainError;
pub use rpc::{JsonRpcContractClient, RpcConfig};

pub use alloy_primitives::Address;

/// Result type for chain-reader operations
pub type Result<T> = std::result::Result<T, ChainError>;
