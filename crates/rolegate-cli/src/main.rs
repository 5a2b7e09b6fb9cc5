//! Rolegate - on-chain holdings to Discord roles
//!
//! The `rolegate` command runs holdings checks and verifications from a
//! settings file.
//!
//! ## Commands
//!
//! - `check`: print each rule's holdings snapshot for a wallet
//! - `verify`: run the full verification for a wallet/Discord user pair
//! - `roles`: resolve every configured role against the guild

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chain_reader::{ContractClient, JsonRpcContractClient};
use clap::{Parser, Subcommand};
use discord_directory::{DiscordRoleDirectory, RoleDirectory};
use rolegate_core::{
    verification_span, HoldingsSnapshot, RoleCapacity, Settings, VerificationService,
    VerifiedSignIn,
};
use rolegate_state::SurrealUserStore;
use serde::Serialize;
use tracing::{info, Instrument, Level};

#[derive(Parser)]
#[command(name = "rolegate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Map on-chain NFT holdings onto Discord roles", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the holdings snapshot of a wallet for every rule
    Check {
        /// Settings file (TOML)
        #[arg(short, long, env = "ROLEGATE_CONFIG", default_value = "rolegate.toml")]
        config: PathBuf,

        /// Wallet address to check
        #[arg(short, long)]
        wallet: String,
    },

    /// Verify a signed-in wallet: evaluate rules, sync roles, save the user
    Verify {
        /// Settings file (TOML)
        #[arg(short, long, env = "ROLEGATE_CONFIG", default_value = "rolegate.toml")]
        config: PathBuf,

        /// Wallet address that signed in
        #[arg(short, long)]
        wallet: String,

        /// Discord user id to link the wallet to
        #[arg(short, long)]
        discord_user: String,
    },

    /// Show every configured role as the guild sees it
    Roles {
        /// Settings file (TOML)
        #[arg(short, long, env = "ROLEGATE_CONFIG", default_value = "rolegate.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    rolegate_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Check { config, wallet } => cmd_check(&config, &wallet).await,
        Commands::Verify {
            config,
            wallet,
            discord_user,
        } => cmd_verify(&config, &wallet, &discord_user).await,
        Commands::Roles { config } => cmd_roles(&config).await,
    }
}

fn load_settings(path: &Path) -> Result<Settings> {
    Settings::load(path).with_context(|| format!("Failed to load settings from {:?}", path))
}

fn contract_client(settings: &Settings) -> Result<Arc<dyn ContractClient>> {
    let client = JsonRpcContractClient::new(settings.rpc.clone())
        .context("Failed to create JSON-RPC client")?;
    Ok(Arc::new(client))
}

fn role_directory(settings: &Settings) -> Result<Arc<dyn RoleDirectory>> {
    let config = settings.discord_config()?.clone();
    let directory =
        DiscordRoleDirectory::new(config).context("Failed to create Discord client")?;
    Ok(Arc::new(directory))
}

#[derive(Serialize)]
struct CheckReport {
    rule: String,
    holdings: HoldingsSnapshot,
}

/// Read holdings only; no directory calls
async fn cmd_check(config: &Path, wallet: &str) -> Result<()> {
    let settings = load_settings(config)?;
    let aggregators = settings.build_aggregators(contract_client(&settings)?)?;

    let check_id = uuid::Uuid::new_v4().to_string();
    let reports = async {
        let mut reports = Vec::with_capacity(aggregators.len());
        for (rule, aggregator) in aggregators {
            let holdings = aggregator.check(Some(wallet)).await;
            reports.push(CheckReport { rule, holdings });
        }
        reports
    }
    .instrument(verification_span(&check_id, wallet))
    .await;

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

/// Full verification flow against the configured store and guild
async fn cmd_verify(config: &Path, wallet: &str, discord_user: &str) -> Result<()> {
    let settings = load_settings(config)?;
    let executor =
        settings.build_executor(contract_client(&settings)?, role_directory(&settings)?)?;
    let store = SurrealUserStore::connect(&settings.store)
        .await
        .context("Failed to connect to user store")?;

    let service = VerificationService::new(Arc::new(store), executor);
    let user = service
        .verify(VerifiedSignIn::now(wallet, discord_user))
        .await
        .context("Verification failed")?;

    info!(wallet = %wallet, discord_user = %discord_user, "verification saved");
    println!("{}", serde_json::to_string_pretty(&user.status)?);
    Ok(())
}

#[derive(Serialize)]
struct RoleReport {
    rule: String,
    name: String,
    id: String,
    found: bool,
    holders: Option<u64>,
    capacity: RoleCapacity,
}

/// Resolve configured roles and report their holder counts
async fn cmd_roles(config: &Path) -> Result<()> {
    let settings = load_settings(config)?;
    let directory = role_directory(&settings)?;

    let mut reports = Vec::new();
    for rule in &settings.rules {
        for role in &rule.roles {
            let found = directory
                .fetch_role(&role.id)
                .await
                .with_context(|| format!("Failed to fetch role {}", role.id))?;
            let holders = match found {
                Some(_) => Some(
                    directory
                        .current_holder_count(&role.id)
                        .await
                        .with_context(|| format!("Failed to count holders of {}", role.id))?,
                ),
                None => None,
            };
            reports.push(RoleReport {
                rule: rule.name.clone(),
                name: found.map(|r| r.name).unwrap_or_else(|| role.name.clone()),
                id: role.id.clone(),
                found: holders.is_some(),
                holders,
                capacity: role.capacity,
            });
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
