//! Role Synchronizer: apply one grant/revoke decision idempotently.

use std::sync::Arc;

use discord_directory::{DiscordUser, Role, RoleDirectory};
use tracing::{error, instrument};

use crate::domain::{DirectoryMutationError, SyncOutcome};
use crate::obs;

/// Applies role decisions against a [`RoleDirectory`].
///
/// Directory failures never escape: they are logged and reported as
/// [`SyncOutcome::Failed`].
#[derive(Clone)]
pub struct RoleSynchronizer {
    directory: Arc<dyn RoleDirectory>,
}

impl RoleSynchronizer {
    pub fn new(directory: Arc<dyn RoleDirectory>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Arc<dyn RoleDirectory> {
        &self.directory
    }

    /// Bring `user`'s membership of `role` in line with the decision.
    ///
    /// | qualifies | available | holds | action          |
    /// |-----------|-----------|-------|-----------------|
    /// | yes       | yes       | no    | add             |
    /// | yes       | yes       | yes   | none            |
    /// | yes       | no        | any   | none (capacity) |
    /// | no        | any       | yes   | remove          |
    /// | no        | any       | no    | none            |
    #[instrument(skip_all, fields(user = %user, role_name = %role_name))]
    pub async fn manage_role(
        &self,
        user: &DiscordUser,
        role: Option<&Role>,
        role_name: &str,
        qualifies: bool,
        role_available: bool,
    ) -> SyncOutcome {
        let Some(role) = role else {
            error!(role_name = %role_name, "role not resolved, nothing to sync");
            return SyncOutcome::RoleMissing;
        };

        let outcome = match self.apply(user, role, role_name, qualifies, role_available).await {
            Ok(outcome) => outcome,
            Err(err) => {
                obs::emit_mutation_failed(role_name, &user.id, &err);
                SyncOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };

        obs::emit_role_synced(role_name, &role.id, qualifies, role_available, &outcome);
        outcome
    }

    async fn apply(
        &self,
        user: &DiscordUser,
        role: &Role,
        role_name: &str,
        qualifies: bool,
        role_available: bool,
    ) -> Result<SyncOutcome, DirectoryMutationError> {
        if qualifies && !role_available {
            obs::emit_capacity_exceeded(role_name, &role.id);
            return Ok(SyncOutcome::CapacityExceeded);
        }

        let holds = self.directory.user_has_role(user, role).await?;
        match (qualifies, holds) {
            (true, false) => {
                self.directory.add_role(user, role).await?;
                Ok(SyncOutcome::Granted)
            }
            (true, true) => Ok(SyncOutcome::AlreadyHeld),
            (false, true) => {
                self.directory.remove_role(user, role).await?;
                Ok(SyncOutcome::Revoked)
            }
            (false, false) => Ok(SyncOutcome::NotHeld),
        }
    }
}
