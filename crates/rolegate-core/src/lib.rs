//! Rolegate Core Library
//!
//! Maps on-chain holdings onto Discord roles: read a wallet's holdings from
//! the configured contracts, decide which roles it qualifies for, and sync
//! those roles on the guild.
//!
//! ## Layer 2 - Verification
//!
//! - `reader`: typed, time-bounded contract reads
//! - `aggregator`: `check`, one `HoldingsSnapshot` per wallet
//! - `evaluator`: `execute`, one `RoleDecision` per configured role
//! - `synchronizer`: `manage_role`, idempotent add/remove
//! - `rules` / `verification`: the sign-in flow tying it together

pub mod aggregator;
pub mod domain;
pub mod evaluator;
pub mod obs;
pub mod reader;
pub mod rules;
pub mod settings;
pub mod synchronizer;
pub mod telemetry;
pub mod verification;

pub use aggregator::{HoldingAggregator, RuleContracts};

pub use domain::{
    ContractCallError, DirectoryMutationError, HoldingCategory, HoldingsSnapshot, Result,
    RoleCapacity, RoleDecision, RolePolicy, RolegateError, RuleOutcome, SyncOutcome,
};

pub use evaluator::EntitlementEvaluator;

pub use obs::{
    emit_capacity_exceeded, emit_category_failed, emit_contract_read, emit_contract_read_skipped,
    emit_mutation_failed, emit_role_evaluation_failed, emit_role_synced,
    emit_verification_finished, emit_verification_started, verification_span,
};

pub use reader::{ContractReader, ReaderConfig, StakingGeneration};

pub use rules::{EntitlementRule, RuleExecutor};

pub use settings::{ContractSettings, RoleSettings, RuleSettings, Settings};

pub use synchronizer::RoleSynchronizer;

pub use telemetry::init_tracing;

pub use verification::{VerificationService, VerifiedSignIn};

pub use chain_reader::{Address, TokenId};
pub use discord_directory::{DiscordUser, Role};
pub use rolegate_state::User;
