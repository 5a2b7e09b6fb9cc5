//! JSON-RPC contract client
//!
//! Executes view calls with `eth_call` through an alloy HTTP provider.

use alloy_primitives::Bytes;
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types::{BlockId, BlockNumberOrTag, TransactionRequest};
use alloy_transport_http::Http;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::call::{ContractCall, ContractValue};
use crate::client::ContractClient;
use crate::error::ChainError;
use crate::Result;

/// RPC endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Node HTTP endpoint
    pub url: String,
    /// Per-call bound in milliseconds, applied by the contract reader
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Block tag the calls are evaluated at (`latest`, `finalized`, `0x..`)
    #[serde(default = "default_block")]
    pub block: String,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_block() -> String {
    "latest".to_string()
}

impl Default for RpcConfig {
    fn default() -> Self {
        RpcConfig {
            url: std::env::var("ROLEGATE_RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8545".to_string()),
            timeout_ms: default_timeout_ms(),
            block: default_block(),
        }
    }
}

impl RpcConfig {
    /// Create config for a specific node
    pub fn new(url: &str) -> Self {
        RpcConfig {
            url: url.to_string(),
            timeout_ms: default_timeout_ms(),
            block: default_block(),
        }
    }

    /// Set the per-call bound
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn block_id(&self) -> Result<BlockId> {
        self.block
            .parse::<BlockNumberOrTag>()
            .map(BlockId::from)
            .map_err(|e| ChainError::Config(format!("invalid block tag {:?}: {e}", self.block)))
    }

    fn endpoint(&self) -> Result<reqwest::Url> {
        self.url
            .parse()
            .map_err(|e| ChainError::Config(format!("invalid RPC url {:?}: {e}", self.url)))
    }
}

/// `ContractClient` backed by a JSON-RPC node
pub struct JsonRpcContractClient {
    config: RpcConfig,
    block: BlockId,
    provider: RootProvider<Http<reqwest::Client>>,
}

impl JsonRpcContractClient {
    /// Create a new client
    pub fn new(config: RpcConfig) -> Result<Self> {
        let block = config.block_id()?;
        let provider = ProviderBuilder::new().on_http(config.endpoint()?);

        Ok(JsonRpcContractClient {
            config,
            block,
            provider,
        })
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

#[async_trait]
impl ContractClient for JsonRpcContractClient {
    #[instrument(skip_all, fields(contract = %call.address, method = call.method.name()))]
    async fn call(&self, call: &ContractCall) -> Result<ContractValue> {
        let tx = TransactionRequest::default()
            .to(call.address)
            .input(Bytes::from(call.method.encode()).into());

        let raw = self.provider.call(&tx).block(self.block).await?;
        debug!(bytes = raw.len(), "eth_call returned");
        call.method.decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{parse_address, ContractMethod};

    #[test]
    fn config_builder() {
        let config = RpcConfig::new("http://node:8545").with_timeout_ms(2_500);
        assert_eq!(config.url, "http://node:8545");
        assert_eq!(config.timeout_ms, 2_500);
        assert_eq!(config.block, "latest");
    }

    #[test]
    fn block_tags_and_numbers_parse() {
        let mut config = RpcConfig::new("http://node:8545");
        assert_eq!(
            config.block_id().unwrap(),
            BlockId::Number(BlockNumberOrTag::Latest)
        );

        config.block = "0x10".to_string();
        assert_eq!(
            config.block_id().unwrap(),
            BlockId::Number(BlockNumberOrTag::Number(16))
        );
    }

    #[test]
    fn bad_block_tag_is_a_config_error() {
        let mut config = RpcConfig::new("http://node:8545");
        config.block = "yesterday".to_string();
        assert!(matches!(
            JsonRpcContractClient::new(config),
            Err(ChainError::Config(_))
        ));
    }

    #[test]
    fn bad_url_is_a_config_error() {
        assert!(matches!(
            JsonRpcContractClient::new(RpcConfig::new("not a url")),
            Err(ChainError::Config(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_transport_error() {
        let client = JsonRpcContractClient::new(RpcConfig::new("http://127.0.0.1:1")).unwrap();
        let owner = parse_address("0x15cc16bfe6fac624247490aa29b6d632be549f00").unwrap();
        let call = ContractCall::new(owner, ContractMethod::BalanceOf { owner });

        let err = client.call(&call).await.unwrap_err();
        assert!(matches!(err, ChainError::Transport(_)), "{err}");
    }
}
