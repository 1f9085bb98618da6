//! TOML configuration.
//!
//! Every section is optional; a missing config file yields the built-in
//! defaults so the offline commands work without any setup.
//!
//! ```toml
//! [github]
//! user = "girishlade111"
//! api_base = "https://api.github.com"
//!
//! [catalog]
//! path = "./config/catalog.toml"
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitHubConfig {
    /// Account whose repositories back the catalog's projects.
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_commits_per_project")]
    pub commits_per_project: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            commits_per_project: default_commits_per_project(),
        }
    }
}

fn default_user() -> String {
    "girishlade111".to_string()
}
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_user_agent() -> String {
    "girishlade111-portfolio".to_string()
}
fn default_accept() -> String {
    "application/vnd.github.v3+json".to_string()
}
fn default_commits_per_project() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Catalog file replacing the built-in table.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

/// Load the configuration at `path`, or the defaults if no file exists there.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.github.user.trim().is_empty() {
        anyhow::bail!("github.user must not be empty");
    }

    if !config.github.api_base.starts_with("http") {
        anyhow::bail!(
            "github.api_base must be an http(s) URL, got '{}'",
            config.github.api_base
        );
    }

    if !(1..=100).contains(&config.github.commits_per_project) {
        anyhow::bail!("github.commits_per_project must be in [1, 100]");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}
