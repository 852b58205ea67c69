//! Configuration file support for repomirror.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `REPOMIRROR_`, nested with `__`,
//!    e.g., `REPOMIRROR_GITHUB__TOKEN`), then the legacy `GITHUB_TOKEN`
//! 3. Config file (./repomirror.toml, then ~/.config/repomirror/config.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/repomirror/repomirror.db` on Linux
//! (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/repomirror/repomirror.db"  # optional, this is the default
//!
//! [github]
//! token = "ghp_..."  # or use REPOMIRROR_GITHUB__TOKEN / GITHUB_TOKEN
//! api_url = "https://api.github.com"  # GitHub Enterprise: https://ghe.example.com/api/v3
//! requests_per_second = 10
//!
//! [sync]
//! concurrency = 4
//! max_retries = 5
//! retry_delay_secs = 300
//! include_pull_requests = false
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use repomirror::RetryPolicy;
use repomirror::github::GITHUB_API_URL;
use repomirror::platform::GITHUB_DEFAULT_RPS;
use repomirror::sync::SyncOptions;
use serde::Deserialize;

const APP_NAME: &str = "repomirror";
const LEGACY_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    /// Default sync options.
    pub sync: SyncConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    pub token: Option<String>,
    /// REST API base URL.
    pub api_url: String,
    /// Proactive request pacing; 0 disables it.
    pub requests_per_second: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: GITHUB_API_URL.to_string(),
            requests_per_second: GITHUB_DEFAULT_RPS,
        }
    }
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Jobs run at once by `sync all`.
    pub concurrency: usize,
    /// Retries after a failed job.
    pub max_retries: usize,
    /// Seconds between retries.
    pub retry_delay_secs: u64,
    /// Mirror pull requests listed by the issues endpoint.
    pub include_pull_requests: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_retries: 5,
            retry_delay_secs: 300,
            include_pull_requests: false,
        }
    }
}

impl SyncConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }

    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            include_pull_requests: self.include_pull_requests,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/repomirror/config.toml)
    /// 3. Local config file (./repomirror.toml)
    /// 4. Environment variables with REPOMIRROR_ prefix
    /// 5. Legacy `GITHUB_TOKEN` when no token was configured
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("repomirror.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./repomirror.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., REPOMIRROR_DATABASE__URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("REPOMIRROR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        };

        config.apply_legacy_token(std::env::var(LEGACY_TOKEN_VAR).ok());
        config
    }

    fn apply_legacy_token(&mut self, legacy: Option<String>) {
        if self.github_token().is_none() {
            self.github.token = legacy.filter(|t| !t.trim().is_empty());
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter enables read-write access and creates the file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("repomirror.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// The configured GitHub token, ignoring blank values.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .filter(|token| !token.trim().is_empty())
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/repomirror` or `~/.local/state/repomirror`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}
