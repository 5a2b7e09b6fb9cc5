//! Discord-Directory: guild role access for rolegate
//!
//! Everything rolegate needs from Discord is five calls: resolve a role, count
//! its holders, check whether a member holds it, and add or remove it.
//!
//! ## Layer 1 - Collaborators
//!
//! ## Key Components
//!
//! - `RoleDirectory`: async role lookup and membership mutation
//! - `DiscordRoleDirectory`: Discord REST v10 with a bot token
//! - `fakes::MemoryRoleDirectory`: in-memory guild with a mutation log

pub mod directory;
mod error;
pub mod fakes;
pub mod rest;

pub use directory::{DirectoryResult, DiscordUser, Role, RoleDirectory};
pub use error::{DirectoryError, MutationKind};
pub use rest::{DiscordConfig, DiscordRoleDirectory};
