//! TOML settings: endpoints, stores and the rules to evaluate.
//!
//! ```toml
//! [rpc]
//! url = "https://eth.example/rpc"
//!
//! [discord]
//! guild_id = "123"
//!
//! [[rules]]
//! name = "Mice Verifier"
//! [rules.contracts]
//! genesis = "0xC7492fDE60f2eA4DBa3d7660e9B6F651b2841f00"
//! [[rules.roles]]
//! name = "genesis mice"
//! id = "950273459013955614"
//! categories = ["genesis"]
//! ```
//!
//! Environment overrides are applied by [`Settings::load`]:
//! `ROLEGATE_RPC_URL`, `DISCORD_BOT_TOKEN`, `DISCORD_GUILD_ID`,
//! `DISCORD_API_BASE` and `ROLEGATE_STORE_URL`.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chain_reader::{parse_address, Address, ContractClient, RpcConfig};
use discord_directory::{DiscordConfig, RoleDirectory};
use rolegate_state::StoreConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{HoldingAggregator, RuleContracts};
use crate::domain::{HoldingCategory, Result, RoleCapacity, RolePolicy, RolegateError};
use crate::evaluator::EntitlementEvaluator;
use crate::reader::{ContractReader, ReaderConfig};
use crate::rules::{EntitlementRule, RuleExecutor};
use crate::synchronizer::RoleSynchronizer;

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub discord: Option<DiscordConfig>,
    #[serde(default)]
    pub store: StoreConfig,
    /// Per-call reader bound; defaults to `rpc.timeout_ms`
    #[serde(default)]
    pub reader: Option<ReaderConfig>,
    #[serde(default)]
    pub rules: Vec<RuleSettings>,
}

/// One `[[rules]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSettings {
    pub name: String,
    #[serde(default)]
    pub contracts: ContractSettings,
    #[serde(default)]
    pub roles: Vec<RoleSettings>,
}

/// Contract addresses of one rule, as written in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSettings {
    pub genesis: Option<String>,
    pub baby: Option<String>,
    pub staking_v1: Option<String>,
    pub staking_v2: Option<String>,
    pub breeding: Option<String>,
}

impl ContractSettings {
    fn raw(&self, category: HoldingCategory) -> Option<&str> {
        match category {
            HoldingCategory::Genesis => self.genesis.as_deref(),
            HoldingCategory::Baby => self.baby.as_deref(),
            HoldingCategory::StakingV1 => self.staking_v1.as_deref(),
            HoldingCategory::StakingV2 => self.staking_v2.as_deref(),
            HoldingCategory::Breeding => self.breeding.as_deref(),
        }
    }

    /// Parse every configured address.
    pub fn resolve(&self, rule: &str) -> Result<RuleContracts> {
        let parse = |category: HoldingCategory| -> Result<Option<Address>> {
            self.raw(category)
                .map(|raw| {
                    parse_address(raw).map_err(|e| {
                        RolegateError::Settings(format!("rule {rule:?}: {category} contract: {e}"))
                    })
                })
                .transpose()
        };
        Ok(RuleContracts {
            genesis: parse(HoldingCategory::Genesis)?,
            baby: parse(HoldingCategory::Baby)?,
            staking_v1: parse(HoldingCategory::StakingV1)?,
            staking_v2: parse(HoldingCategory::StakingV2)?,
            breeding: parse(HoldingCategory::Breeding)?,
        })
    }
}

/// One `[[rules.roles]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSettings {
    pub name: String,
    pub id: String,
    pub categories: Vec<HoldingCategory>,
    #[serde(default)]
    pub capacity: RoleCapacity,
}

impl RoleSettings {
    pub fn policy(&self) -> RolePolicy {
        RolePolicy::new(&self.name, &self.id, self.categories.iter().copied())
            .with_capacity(self.capacity)
    }
}

impl Settings {
    /// Read, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RolegateError::Settings(format!("cannot read {}: {e}", path.display()))
        })?;
        let settings = Self::from_toml_str(&raw)?.apply_env();
        settings.validate()?;
        debug!(path = %path.display(), rules = settings.rules.len(), "settings loaded");
        Ok(settings)
    }

    /// Parse without environment overrides or validation.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| RolegateError::Settings(e.to_string()))
    }

    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("ROLEGATE_RPC_URL") {
            self.rpc.url = url;
        }
        if let Ok(guild_id) = std::env::var("DISCORD_GUILD_ID") {
            self.discord.get_or_insert_with(|| DiscordConfig::new(&guild_id));
        }
        self.discord = self.discord.map(DiscordConfig::apply_env);
        self.store = self.store.apply_env();
        self
    }

    /// Reject settings that could not produce a working rule set.
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(RolegateError::Settings("no rules configured".to_string()));
        }
        if self.rpc.timeout_ms == 0 {
            return Err(RolegateError::Settings("rpc.timeout_ms must be non-zero".to_string()));
        }
        if self.reader.is_some_and(|r| r.call_timeout.is_zero()) {
            return Err(RolegateError::Settings(
                "reader.call_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.discord.as_ref().is_some_and(|d| d.timeout_ms == 0) {
            return Err(RolegateError::Settings(
                "discord.timeout_ms must be non-zero".to_string(),
            ));
        }

        for rule in &self.rules {
            let invalid = |msg: String| RolegateError::Settings(format!("rule {:?}: {msg}", rule.name));

            if rule.name.trim().is_empty() {
                return Err(RolegateError::Settings("rule with empty name".to_string()));
            }
            rule.contracts.resolve(&rule.name)?;
            if rule.roles.is_empty() {
                return Err(invalid("no roles configured".to_string()));
            }

            let mut seen = BTreeSet::new();
            for role in &rule.roles {
                if role.id.trim().is_empty() {
                    return Err(invalid(format!("role {:?} has an empty id", role.name)));
                }
                if !seen.insert(role.id.as_str()) {
                    return Err(invalid(format!("role id {} configured twice", role.id)));
                }
                if role.categories.is_empty() {
                    return Err(invalid(format!("role {:?} has no categories", role.name)));
                }
                if let Some(missing) = role
                    .categories
                    .iter()
                    .find(|c| rule.contracts.raw(**c).is_none())
                {
                    return Err(invalid(format!(
                        "role {:?} uses {missing} but no {missing} contract is configured",
                        role.name
                    )));
                }
                if role.capacity.max_holders() == Some(0) {
                    return Err(invalid(format!(
                        "role {:?} is capped at zero holders",
                        role.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn reader_config(&self) -> ReaderConfig {
        self.reader.unwrap_or_else(|| {
            ReaderConfig::default().with_call_timeout(Duration::from_millis(self.rpc.timeout_ms))
        })
    }

    /// The Discord section, required by anything that touches roles.
    pub fn discord_config(&self) -> Result<&DiscordConfig> {
        self.discord
            .as_ref()
            .ok_or_else(|| RolegateError::Settings("missing [discord] section".to_string()))
    }

    /// One holdings aggregator per rule, in configuration order.
    pub fn build_aggregators(
        &self,
        client: Arc<dyn ContractClient>,
    ) -> Result<Vec<(String, HoldingAggregator)>> {
        let reader = ContractReader::new(client, self.reader_config());
        self.rules
            .iter()
            .map(|rule| {
                let contracts = rule.contracts.resolve(&rule.name)?;
                Ok((
                    rule.name.clone(),
                    HoldingAggregator::new(reader.clone(), contracts),
                ))
            })
            .collect()
    }

    /// Wire every rule onto the given collaborators.
    pub fn build_executor(
        &self,
        client: Arc<dyn ContractClient>,
        directory: Arc<dyn RoleDirectory>,
    ) -> Result<RuleExecutor> {
        let synchronizer = RoleSynchronizer::new(directory);
        let rules = self
            .build_aggregators(client)?
            .into_iter()
            .zip(&self.rules)
            .map(|((name, aggregator), rule)| {
                let policies = rule.roles.iter().map(RoleSettings::policy).collect();
                EntitlementRule::new(
                    name,
                    aggregator,
                    EntitlementEvaluator::new(policies, synchronizer.clone()),
                )
            })
            .collect();

        Ok(RuleExecutor::new(rules))
    }
}
