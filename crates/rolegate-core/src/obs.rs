//! Structured observability hooks for the verification lifecycle.
//!
//! This module provides:
//! - A verification-scoped tracing span to instrument futures with
//! - Emission functions for contract reads, category failures, role syncs and
//!   the start/finish of a verification
//!
//! Failures are emitted at `error!`/`warn!` level with the error's Display and
//! Debug forms, so a log line carries both the message and the source chain.

use std::fmt::{Debug, Display};

use tracing::{error, info, warn};

/// Span tagging every event of one verification.
pub fn verification_span(verification_id: &str, wallet: &str) -> tracing::Span {
    tracing::info_span!(
        "rolegate.verification",
        verification_id = %verification_id,
        wallet = %wallet,
    )
}

/// Emit event: verification started for a wallet/Discord user pair.
pub fn emit_verification_started(wallet: &str, discord_user_id: &str, rules: usize) {
    info!(
        event = "verification.started",
        wallet = %wallet,
        discord_user_id = %discord_user_id,
        rules = rules,
    );
}

/// Emit event: verification finished.
pub fn emit_verification_finished(wallet: &str, decisions: usize, duration_ms: u64) {
    info!(
        event = "verification.finished",
        wallet = %wallet,
        decisions = decisions,
        duration_ms = duration_ms,
    );
}

/// Emit event: a contract read completed.
pub fn emit_contract_read(contract: &dyn Display, method: &str, wallet: &str, result: &dyn Debug) {
    info!(
        event = "contract.read",
        contract = %contract,
        method = %method,
        wallet = %wallet,
        result = ?result,
    );
}

/// Emit event: a contract read was skipped because the user has no wallet.
pub fn emit_contract_read_skipped(contract: &dyn Display, method: &str) {
    info!(
        event = "contract.read_skipped",
        contract = %contract,
        method = %method,
        reason = "wallet address is null/empty",
    );
}

/// Emit event: one holding category could not be read (error level).
pub fn emit_category_failed(category: &str, error: &(dyn std::error::Error + 'static)) {
    error!(
        event = "holdings.category_failed",
        category = %category,
        error = %error,
        detail = ?error,
    );
}

/// Emit event: a role decision was applied.
pub fn emit_role_synced(role_name: &str, role_id: &str, qualifies: bool, available: bool, outcome: &dyn Display) {
    info!(
        event = "role.synced",
        role_name = %role_name,
        role_id = %role_id,
        qualifies = qualifies,
        role_available = available,
        outcome = %outcome,
    );
}

/// Emit event: the member qualifies but the role is full (warning level).
pub fn emit_capacity_exceeded(role_name: &str, role_id: &str) {
    warn!(
        event = "role.capacity_exceeded",
        role_name = %role_name,
        role_id = %role_id,
    );
}

/// Emit event: a directory mutation failed (error level).
pub fn emit_mutation_failed(role_name: &str, user_id: &str, error: &(dyn std::error::Error + 'static)) {
    error!(
        event = "role.mutation_failed",
        role_name = %role_name,
        user_id = %user_id,
        error = %error,
        detail = ?error,
    );
}

/// Emit event: evaluation of one role aborted (error level).
pub fn emit_role_evaluation_failed(role_name: &str, role_id: &str, error: &(dyn std::error::Error + 'static)) {
    error!(
        event = "role.evaluation_failed",
        role_name = %role_name,
        role_id = %role_id,
        error = %error,
        detail = ?error,
    );
}
