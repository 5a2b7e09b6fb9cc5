//! The `ContractClient` seam.

use async_trait::async_trait;

use crate::call::{ContractCall, ContractValue};
use crate::Result;

/// Read-only access to deployed contracts.
///
/// Implementations perform exactly one network round trip per `call` and do
/// not retry; retry, timeout and empty-wallet policy belong to the caller.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Execute a view call and decode its return value.
    async fn call(&self, call: &ContractCall) -> Result<ContractValue>;
}
