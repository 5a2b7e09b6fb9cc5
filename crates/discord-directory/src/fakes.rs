//! In-memory fakes for the role directory (testing only)
//!
//! `MemoryRoleDirectory` models a guild as a role table plus a member → roles
//! map, logs every successful mutation, and can be told to fail lookups or
//! mutations.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::directory::{DirectoryResult, DiscordUser, Role, RoleDirectory};
use crate::error::{DirectoryError, MutationKind};

/// One applied membership change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub kind: MutationKind,
    pub user_id: String,
    pub role_id: String,
}

#[derive(Debug, Default)]
struct Guild {
    roles: HashMap<String, Role>,
    members: HashMap<String, BTreeSet<String>>,
    other_holders: HashMap<String, u64>,
    failing_mutations: HashSet<String>,
    failing_lookups: HashSet<String>,
    log: Vec<Mutation>,
}

/// In-memory guild implementing [`RoleDirectory`].
#[derive(Debug, Default)]
pub struct MemoryRoleDirectory {
    guild: Mutex<Guild>,
}

impl MemoryRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role to the guild.
    pub fn with_role(self, id: &str, name: &str) -> Self {
        self.guild.lock().unwrap().roles.insert(
            id.to_string(),
            Role {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    /// Give `user_id` the role before the test starts (not logged).
    pub fn with_member_role(self, user_id: &str, role_id: &str) -> Self {
        self.guild
            .lock()
            .unwrap()
            .members
            .entry(user_id.to_string())
            .or_default()
            .insert(role_id.to_string());
        self
    }

    /// Pretend `count` other members already hold the role.
    pub fn with_other_holders(self, role_id: &str, count: u64) -> Self {
        self.guild
            .lock()
            .unwrap()
            .other_holders
            .insert(role_id.to_string(), count);
        self
    }

    /// Make every add/remove of this role fail.
    pub fn failing_mutations_for(self, role_id: &str) -> Self {
        self.guild
            .lock()
            .unwrap()
            .failing_mutations
            .insert(role_id.to_string());
        self
    }

    /// Make lookups (fetch, holder count) of this role fail.
    pub fn failing_lookups_for(self, role_id: &str) -> Self {
        self.guild
            .lock()
            .unwrap()
            .failing_lookups
            .insert(role_id.to_string());
        self
    }

    /// Successful mutations, in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.guild.lock().unwrap().log.clone()
    }

    /// Whether `user_id` currently holds `role_id`.
    pub fn holds(&self, user_id: &str, role_id: &str) -> bool {
        self.guild
            .lock()
            .unwrap()
            .members
            .get(user_id)
            .is_some_and(|roles| roles.contains(role_id))
    }

    fn lookup_failure(role_id: &str) -> DirectoryError {
        DirectoryError::Api {
            status: 500,
            message: format!("lookup of role {role_id} failed"),
        }
    }

    fn apply(&self, kind: MutationKind, user: &DiscordUser, role: &Role) -> DirectoryResult<()> {
        let mut guild = self.guild.lock().unwrap();
        if guild.failing_mutations.contains(&role.id) {
            return Err(DirectoryError::Mutation {
                kind,
                role_id: role.id.clone(),
                user_id: user.id.clone(),
                reason: "Missing Permissions".to_string(),
            });
        }

        let roles = guild.members.entry(user.id.clone()).or_default();
        match kind {
            MutationKind::Add => roles.insert(role.id.clone()),
            MutationKind::Remove => roles.remove(&role.id),
        };
        guild.log.push(Mutation {
            kind,
            user_id: user.id.clone(),
            role_id: role.id.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for MemoryRoleDirectory {
    async fn fetch_role(&self, role_id: &str) -> DirectoryResult<Option<Role>> {
        let guild = self.guild.lock().unwrap();
        if guild.failing_lookups.contains(role_id) {
            return Err(Self::lookup_failure(role_id));
        }
        Ok(guild.roles.get(role_id).cloned())
    }

    async fn current_holder_count(&self, role_id: &str) -> DirectoryResult<u64> {
        let guild = self.guild.lock().unwrap();
        if guild.failing_lookups.contains(role_id) {
            return Err(Self::lookup_failure(role_id));
        }
        let members = guild
            .members
            .values()
            .filter(|roles| roles.contains(role_id))
            .count() as u64;
        let others = guild.other_holders.get(role_id).copied().unwrap_or(0);
        Ok(members + others)
    }

    async fn user_has_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<bool> {
        Ok(self.holds(&user.id, &role.id))
    }

    async fn add_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<()> {
        self.apply(MutationKind::Add, user, role)
    }

    async fn remove_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<()> {
        self.apply(MutationKind::Remove, user, role)
    }
}
