//! Domain types for rolegate: holdings, role policies and decisions.

pub mod decision;
pub mod error;
pub mod holdings;
pub mod policy;

pub use decision::{RoleDecision, RuleOutcome, SyncOutcome};
pub use error::{ContractCallError, DirectoryMutationError, Result, RolegateError};
pub use holdings::{HoldingCategory, HoldingsSnapshot};
pub use policy::{RoleCapacity, RolePolicy};
