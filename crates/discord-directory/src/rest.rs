//! Discord REST role directory
//!
//! Talks to the Discord HTTP API (v10) with a bot token. Counting role holders
//! pages through the guild member list, so the bot needs the server members
//! intent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::directory::{DirectoryResult, DiscordUser, Role, RoleDirectory};
use crate::error::{DirectoryError, MutationKind};

const MEMBER_PAGE_LIMIT: usize = 1000;

/// Discord connection configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Guild the roles live in
    pub guild_id: String,
    /// Bot token (usually supplied via DISCORD_BOT_TOKEN)
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// HTTP request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("guild_id", &self.guild_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl DiscordConfig {
    /// Create config for a guild
    pub fn new(guild_id: &str) -> Self {
        DiscordConfig {
            guild_id: guild_id.to_string(),
            token: None,
            api_base: default_api_base(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Set the HTTP timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the bot token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Apply environment overrides
    ///
    /// Reads:
    /// - DISCORD_BOT_TOKEN
    /// - DISCORD_GUILD_ID
    /// - DISCORD_API_BASE
    pub fn apply_env(mut self) -> Self {
        if let Ok(token) = std::env::var("DISCORD_BOT_TOKEN") {
            self.token = Some(token);
        }
        if let Ok(guild_id) = std::env::var("DISCORD_GUILD_ID") {
            self.guild_id = guild_id;
        }
        if let Ok(api_base) = std::env::var("DISCORD_API_BASE") {
            self.api_base = api_base;
        }
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct ApiRole {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiMember {
    #[serde(default)]
    user: Option<ApiUser>,
    #[serde(default)]
    roles: Vec<String>,
}

/// Pick a role out of the guild role list.
fn find_role(roles: Vec<ApiRole>, role_id: &str) -> Option<Role> {
    roles.into_iter().find(|r| r.id == role_id).map(|r| Role {
        id: r.id,
        name: r.name,
    })
}

/// Count holders of `role_id` in one page; also returns the cursor for the next page.
fn count_page(members: &[ApiMember], role_id: &str) -> (u64, Option<String>) {
    let holders = members
        .iter()
        .filter(|m| m.roles.iter().any(|r| r == role_id))
        .count() as u64;
    let last = members
        .last()
        .and_then(|m| m.user.as_ref())
        .map(|u| u.id.clone());
    (holders, last)
}

/// Discord REST implementation of [`RoleDirectory`]
pub struct DiscordRoleDirectory {
    config: DiscordConfig,
    http_client: reqwest::Client,
}

impl DiscordRoleDirectory {
    /// Create a new directory client
    pub fn new(config: DiscordConfig) -> DirectoryResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                "DiscordBot (https://github.com/stevedores-org/rolegate, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DirectoryError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(DiscordRoleDirectory {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http_client.request(method, self.config.url(path));
        if let Some(token) = &self.config.token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bot {token}"));
        }
        req
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> DirectoryResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    async fn mutate(
        &self,
        kind: MutationKind,
        user: &DiscordUser,
        role: &Role,
    ) -> DirectoryResult<()> {
        let method = match kind {
            MutationKind::Add => Method::PUT,
            MutationKind::Remove => Method::DELETE,
        };
        let path = format!(
            "/guilds/{}/members/{}/roles/{}",
            self.config.guild_id, user.id, role.id
        );
        let mutation_err = |reason: String| DirectoryError::Mutation {
            kind,
            role_id: role.id.clone(),
            user_id: user.id.clone(),
            reason,
        };

        let response = self
            .request(method, &path)
            .send()
            .await
            .map_err(|e| mutation_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(mutation_err(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for DiscordRoleDirectory {
    #[instrument(skip(self), fields(guild_id = %self.config.guild_id))]
    async fn fetch_role(&self, role_id: &str) -> DirectoryResult<Option<Role>> {
        let roles: Vec<ApiRole> = self
            .get_json(&format!("/guilds/{}/roles", self.config.guild_id))
            .await?;
        Ok(find_role(roles, role_id))
    }

    #[instrument(skip(self), fields(guild_id = %self.config.guild_id))]
    async fn current_holder_count(&self, role_id: &str) -> DirectoryResult<u64> {
        let mut total = 0u64;
        let mut after = "0".to_string();

        loop {
            let page: Vec<ApiMember> = self
                .get_json(&format!(
                    "/guilds/{}/members?limit={}&after={}",
                    self.config.guild_id, MEMBER_PAGE_LIMIT, after
                ))
                .await?;

            let (holders, last) = count_page(&page, role_id);
            total += holders;
            debug!(page_size = page.len(), holders, "counted member page");

            match last {
                Some(cursor) if page.len() == MEMBER_PAGE_LIMIT => after = cursor,
                _ => break,
            }
        }

        Ok(total)
    }

    async fn user_has_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<bool> {
        let path = format!("/guilds/{}/members/{}", self.config.guild_id, user.id);
        match self.get_json::<ApiMember>(&path).await {
            Ok(member) => Ok(member.roles.iter().any(|r| *r == role.id)),
            Err(DirectoryError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn add_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<()> {
        info!(user = %user, role = %role.name, "adding guild role");
        self.mutate(MutationKind::Add, user, role).await
    }

    async fn remove_role(&self, user: &DiscordUser, role: &Role) -> DirectoryResult<()> {
        info!(user = %user, role = %role.name, "removing guild role");
        self.mutate(MutationKind::Remove, user, role).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(json: &str) -> Vec<ApiMember> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn find_role_by_id() {
        let roles: Vec<ApiRole> = serde_json::from_str(
            r#"[{"id":"1","name":"@everyone","color":0},{"id":"950273459013955614","name":"Outliners OG"}]"#,
        )
        .unwrap();

        let role = find_role(roles, "950273459013955614").unwrap();
        assert_eq!(role.name, "Outliners OG");
    }

    #[test]
    fn find_role_missing() {
        let roles: Vec<ApiRole> = serde_json::from_str(r#"[{"id":"1","name":"@everyone"}]"#).unwrap();
        assert!(find_role(roles, "2").is_none());
    }

    #[test]
    fn count_page_counts_holders_and_returns_cursor() {
        let page = members(
            r#"[
                {"user":{"id":"10"},"roles":["7","8"]},
                {"user":{"id":"11"},"roles":[]},
                {"user":{"id":"12"},"roles":["7"]}
            ]"#,
        );

        let (holders, last) = count_page(&page, "7");
        assert_eq!(holders, 2);
        assert_eq!(last.as_deref(), Some("12"));
    }

    #[test]
    fn count_empty_page() {
        let (holders, last) = count_page(&[], "7");
        assert_eq!(holders, 0);
        assert!(last.is_none());
    }

    #[test]
    fn config_debug_redacts_token() {
        let config = DiscordConfig::new("42").with_token("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn config_timeout_defaults_when_omitted() {
        let config: DiscordConfig = serde_json::from_str(r#"{"guild_id":"42"}"#).unwrap();
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(DiscordConfig::new("42").with_timeout_ms(250).timeout_ms, 250);
    }

    #[tokio::test]
    async fn stalled_api_times_out() {
        // accepts connections but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = DiscordConfig::new("42").with_timeout_ms(100);
        config.api_base = format!("http://{}", listener.local_addr().unwrap());
        let directory = DiscordRoleDirectory::new(config).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), directory.fetch_role("7"))
            .await
            .expect("request should give up on its own");
        assert!(matches!(result, Err(DirectoryError::Http(_))));
    }

    #[test]
    fn config_url_joins_base() {
        let mut config = DiscordConfig::new("42");
        config.api_base = "http://localhost:9000/api/".to_string();
        assert_eq!(config.url("/guilds/42/roles"), "http://localhost:9000/api/guilds/42/roles");
    }
}
