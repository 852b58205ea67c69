//! Repomirror CLI - command-line interface for the issue and commit mirror.

mod commands;
mod config;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::repo::RepoAction;
use crate::commands::sync::SyncAction;

#[derive(Parser)]
#[command(name = "repomirror")]
#[command(version)]
#[command(about = "Mirror repository issues and commits into a local database")]
#[command(
    long_about = "Repomirror keeps a relational copy of tracked repositories: metadata, \
issues with their authors and assignees, and commits linked to the issues they close. \
Each collection is synced incrementally from a stored checkpoint."
)]
#[command(after_long_help = r#"EXAMPLES
    Track a repository and mirror everything:
        $ repomirror repo add rust-lang/rust
        $ repomirror sync all

    Re-fetch every closed issue regardless of the checkpoint:
        $ repomirror sync issues rust-lang/rust --state closed --full

    Mirror one month of commits:
        $ repomirror sync commits rust-lang/rust --since 2024-01-01 --until 2024-02-01

    Mirror the commits of a release branch:
        $ repomirror sync commits rust-lang/rust --sha stable --full

CONFIGURATION
    Repomirror reads configuration from:
      1. ~/.config/repomirror/config.toml (or $XDG_CONFIG_HOME/repomirror/config.toml)
      2. ./repomirror.toml
      3. Environment variables (REPOMIRROR_* prefix, `__` between section and key)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    REPOMIRROR_DATABASE__URL      Database connection string (default: ~/.local/state/repomirror/repomirror.db)
    REPOMIRROR_GITHUB__TOKEN      GitHub personal access token (GITHUB_TOKEN is also read)
    REPOMIRROR_GITHUB__API_URL    GitHub API base URL (default: https://api.github.com)
    RUST_LOG                      Log filter (default: repomirror=info,repomirror_cli=info)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Manage tracked repositories
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },
    /// Sync repositories from the platform
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("repomirror=info,repomirror_cli=info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    // Handle commands that don't require database access first
    match &cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(*shell)?;
            return Ok(());
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output.clone())?;
            return Ok(());
        }
        _ => {}
    }

    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set [database] url in the config")?;

    // Ensure the database directory exists for SQLite
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Database path '{}' is relative - behavior depends on current directory. \
                 Consider using an absolute path.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Repo { action } => {
            commands::repo::handle_repo(action, &database_url).await?;
        }
        Commands::Sync { action } => {
            commands::sync::handle_sync(action, &config, &database_url).await?;
        }
        Commands::Completions { .. } | Commands::Man { .. } => {}
    }

    Ok(())
}
